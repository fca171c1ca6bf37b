//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::CountryCode;

#[test]
fn test_unknown_country_code_is_rejected() {
    let error = "MX".parse::<CountryCode>().unwrap_err();

    match error {
        CoreError::UnsupportedCountry(code) => assert_eq!(code, "MX"),
        _ => panic!("Expected UnsupportedCountry error"),
    }
}

#[test]
fn test_core_error_from_money_error() {
    let money_error = MoneyError::CurrencyMismatch("CRC".to_string(), "PAB".to_string());
    let core_error: CoreError = money_error.into();

    assert!(matches!(core_error, CoreError::Money(_)));
}

#[test]
fn test_core_error_display() {
    let error = CoreError::unsupported_country("AR");
    assert_eq!(error.to_string(), "Unsupported country: AR");
}
