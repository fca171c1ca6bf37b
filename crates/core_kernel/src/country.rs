//! Supported countries
//!
//! The set of countries is closed: every extension bundle, cache entry and
//! session is keyed by one of these codes.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::Currency;

/// ISO 3166-1 alpha-2 code of a country with a claim info extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CountryCode {
    #[serde(rename = "CR")]
    CostaRica,
    #[serde(rename = "PA")]
    Panama,
}

impl CountryCode {
    /// Every supported country, in display order
    pub const ALL: [CountryCode; 2] = [CountryCode::CostaRica, CountryCode::Panama];

    /// Returns the two-letter code
    pub fn code(&self) -> &'static str {
        match self {
            CountryCode::CostaRica => "CR",
            CountryCode::Panama => "PA",
        }
    }

    /// Returns the display name
    pub fn name(&self) -> &'static str {
        match self {
            CountryCode::CostaRica => "Costa Rica",
            CountryCode::Panama => "Panamá",
        }
    }

    /// Returns the local currency used for claim amounts
    pub fn currency(&self) -> Currency {
        match self {
            CountryCode::CostaRica => Currency::CRC,
            CountryCode::Panama => Currency::PAB,
        }
    }

    pub fn timezone(&self) -> Tz {
        match self {
            CountryCode::CostaRica => chrono_tz::America::Costa_Rica,
            CountryCode::Panama => chrono_tz::America::Panama,
        }
    }

    /// Returns the current wall-clock time in the country's timezone
    pub fn local_now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone())
    }

    pub fn locale(&self) -> &'static str {
        match self {
            CountryCode::CostaRica => "es-CR",
            CountryCode::Panama => "es-PA",
        }
    }

    /// Returns true if `code` names a supported country
    pub fn is_supported(code: &str) -> bool {
        code.parse::<CountryCode>().is_ok()
    }

    /// Returns the codes of every supported country
    pub fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(CountryCode::code).collect()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CountryCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CR" => Ok(CountryCode::CostaRica),
            "PA" => Ok(CountryCode::Panama),
            other => Err(CoreError::unsupported_country(other)),
        }
    }
}
