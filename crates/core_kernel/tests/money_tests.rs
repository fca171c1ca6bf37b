//! Unit tests for the Money module
//!
//! Tests cover amount parsing from form values, predicates, currency
//! handling and formatting.

use core_kernel::{parse_amount, Currency, Money, MoneyError};
use rust_decimal_macros::dec;
use serde_json::json;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(150000.50), Currency::CRC);
        assert_eq!(m.amount(), dec!(150000.50));
        assert_eq!(m.currency(), Currency::CRC);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::PAB);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_value_parses_numeric_string() {
        let m = Money::from_value(&json!("15000000"), Currency::CRC).unwrap();
        assert_eq!(m.amount(), dec!(15000000));
    }

    #[test]
    fn test_from_value_parses_number() {
        let m = Money::from_value(&json!(135000), Currency::CRC).unwrap();
        assert_eq!(m.amount(), dec!(135000));
    }

    #[test]
    fn test_from_value_rejects_text() {
        let result = Money::from_value(&json!("N/A"), Currency::PAB);
        assert!(matches!(result, Err(MoneyError::InvalidAmount(_))));
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let m = Money::zero(Currency::USD);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_negative_amount() {
        let m = Money::new(dec!(-1), Currency::CRC);
        assert!(m.is_negative());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_ratio_of_total() {
        let deductible = Money::new(dec!(150000), Currency::CRC);
        let insured = Money::new(dec!(15000000), Currency::CRC);
        assert_eq!(deductible.ratio_of(&insured).unwrap(), dec!(0.01));
    }

    #[test]
    fn test_ratio_of_zero_total_fails() {
        let deductible = Money::new(dec!(1), Currency::CRC);
        let result = deductible.ratio_of(&Money::zero(Currency::CRC));
        assert_eq!(result, Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_currency_mismatch() {
        let a = Money::new(dec!(1), Currency::PAB);
        let b = Money::new(dec!(1), Currency::USD);
        assert!(matches!(a.ratio_of(&b), Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_multiply_by_tariff_factor() {
        let m = Money::new(dec!(1000), Currency::PAB).multiply(dec!(1.15)).unwrap();
        assert_eq!(m.amount(), dec!(1150));
    }

    #[test]
    fn test_multiply_overflow_is_an_error() {
        let m = Money::new(rust_decimal::Decimal::MAX, Currency::PAB);
        assert!(matches!(m.multiply(dec!(1.15)), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_ratio_overflow_is_an_error() {
        let deductible = Money::new(rust_decimal::Decimal::MAX, Currency::CRC);
        let insured = Money::new(dec!(0.0001), Currency::CRC);
        assert!(matches!(deductible.ratio_of(&insured), Err(MoneyError::InvalidAmount(_))));
    }
}

mod formatting {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(Currency::CRC.symbol(), "₡");
        assert_eq!(Currency::PAB.symbol(), "B/.");
        assert_eq!(Currency::USD.symbol(), "$");
    }

    #[test]
    fn test_format_with_symbol() {
        let m = Money::new(dec!(150000), Currency::CRC);
        assert_eq!(m.format_with_symbol(), "₡150000.00");
    }

    #[test]
    fn test_display_uses_code() {
        let m = Money::new(dec!(12.5), Currency::PAB);
        assert_eq!(m.to_string(), "PAB 12.50");
    }

    #[test]
    fn test_parse_amount_with_whitespace() {
        assert_eq!(parse_amount(&json!("  2500 ")), Some(dec!(2500)));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_parse_amount_accepts_integers_as_numbers_and_strings(n in -1_000_000_000i64..1_000_000_000) {
            let expected = rust_decimal::Decimal::from(n);
            prop_assert_eq!(parse_amount(&json!(n)), Some(expected));
            prop_assert_eq!(parse_amount(&json!(n.to_string())), Some(expected));
        }

        #[test]
        fn test_ratio_of_self_is_one(n in 1i64..1_000_000_000) {
            let m = Money::new(rust_decimal::Decimal::from(n), Currency::CRC);
            prop_assert_eq!(m.ratio_of(&m).unwrap(), dec!(1));
        }
    }
}
