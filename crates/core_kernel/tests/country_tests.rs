//! Tests for the supported country enumeration

use core_kernel::{CountryCode, Currency};

#[test]
fn test_supported_codes_in_order() {
    assert_eq!(CountryCode::supported(), vec!["CR", "PA"]);
}

#[test]
fn test_country_names() {
    assert_eq!(CountryCode::CostaRica.name(), "Costa Rica");
    assert_eq!(CountryCode::Panama.name(), "Panamá");
}

#[test]
fn test_country_currency() {
    assert_eq!(CountryCode::CostaRica.currency(), Currency::CRC);
    assert_eq!(CountryCode::Panama.currency(), Currency::PAB);
}

#[test]
fn test_country_timezone() {
    assert_eq!(CountryCode::Panama.timezone(), chrono_tz::America::Panama);
    assert_eq!(CountryCode::CostaRica.locale(), "es-CR");
}

#[test]
fn test_is_supported() {
    assert!(CountryCode::is_supported("CR"));
    assert!(!CountryCode::is_supported(""));
    assert!(!CountryCode::is_supported("XX"));
}

#[test]
fn test_deserialize_from_code() {
    let country: CountryCode = serde_json::from_str("\"CR\"").unwrap();
    assert_eq!(country, CountryCode::CostaRica);
}
