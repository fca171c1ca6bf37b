//! Money types with precise decimal arithmetic
//!
//! Claim amounts arrive from the form as numbers or numeric strings. This
//! module parses them into `rust_decimal` values and pairs them with the
//! country's currency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Costa Rican colón
    CRC,
    /// Panamanian balboa
    PAB,
    USD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CRC => "₡",
            Currency::PAB => "B/.",
            Currency::USD => "$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CRC => "CRC",
            Currency::PAB => "PAB",
            Currency::USD => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Parses a form value (number or numeric string) into an amount
    pub fn from_value(value: &Value, currency: Currency) -> Result<Self, MoneyError> {
        parse_amount(value)
            .map(|amount| Self::new(amount, currency))
            .ok_or_else(|| MoneyError::InvalidAmount(value.to_string()))
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// Multiplies by a scalar (e.g., for rate calculations)
    pub fn multiply(&self, factor: Decimal) -> Result<Self, MoneyError> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or_else(|| MoneyError::InvalidAmount(format!("{} * {factor} overflows", self.amount)))
    }

    /// Returns the share of `total` this amount represents, as a ratio
    pub fn ratio_of(&self, total: &Money) -> Result<Decimal, MoneyError> {
        if self.currency != total.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                total.currency.to_string(),
            ));
        }
        if total.amount.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        self.amount
            .checked_div(total.amount)
            .ok_or_else(|| MoneyError::InvalidAmount(format!("{} / {} overflows", self.amount, total.amount)))
    }

    /// Formats the amount with the currency symbol, e.g. `₡150000.00`
    pub fn format_with_symbol(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.round_to_currency().amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency.code(), self.round_to_currency().amount)
    }
}

/// Parses a JSON number or numeric string into a decimal
///
/// Strings may carry thousands separators (`"15,000,000"`). Anything else,
/// including empty strings, yields `None`.
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                None
            } else {
                Decimal::from_str(&cleaned).ok()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount_accepts_numeric_strings() {
        assert_eq!(parse_amount(&json!("15000000")), Some(dec!(15000000)));
        assert_eq!(parse_amount(&json!("1,500.50")), Some(dec!(1500.50)));
    }

    #[test]
    fn test_parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount(&json!("")), None);
        assert_eq!(parse_amount(&json!("abc")), None);
        assert_eq!(parse_amount(&Value::Null), None);
    }
}
