// Regional endpoint table.
//
// Each account lives in one data center; the Track and App surfaces have a
// host per region while the Beta surface is shared.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Data center hosting the workspace.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    /// Base URLs for every API surface in this region.
    pub const fn endpoints(self) -> Endpoints<'static> {
        match self {
            Self::Us => Endpoints {
                tracking: "https://track.customer.io",
                app: "https://api.customer.io",
                beta: "https://beta-api.customer.io",
            },
            Self::Eu => Endpoints {
                tracking: "https://track-eu.customer.io",
                app: "https://api-eu.customer.io",
                beta: "https://beta-api.customer.io",
            },
        }
    }
}

// Deserialize through `FromStr` so `EU` from the environment is accepted.
impl TryFrom<String> for Region {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The three base URLs a client talks to.
///
/// Borrowed so region constants stay `'static`; the client config owns its
/// own copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints<'a> {
    /// Track API (customers, devices, events). Basic auth.
    pub tracking: &'a str,
    /// App API (transactional email). Bearer auth.
    pub app: &'a str,
    /// Beta API (collections). Bearer auth.
    pub beta: &'a str,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn us_is_default() {
        assert_eq!(Region::default(), Region::Us);
        assert_eq!(Region::Us.endpoints().tracking, "https://track.customer.io");
        assert_eq!(Region::Us.endpoints().app, "https://api.customer.io");
    }

    #[test]
    fn eu_endpoints() {
        let eu = Region::Eu.endpoints();
        assert_eq!(eu.tracking, "https://track-eu.customer.io");
        assert_eq!(eu.app, "https://api-eu.customer.io");
        assert_eq!(eu.beta, Region::Us.endpoints().beta);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Region::from_str("EU").ok(), Some(Region::Eu));
        assert_eq!(Region::from_str("us").ok(), Some(Region::Us));
        assert!(Region::from_str("apac").is_err());
        assert_eq!(Region::Eu.to_string(), "eu");
    }

    #[test]
    fn deserializes_any_case_and_serializes_lowercase() {
        let eu: Region = serde_json::from_str("\"EU\"").unwrap();
        assert_eq!(eu, Region::Eu);
        let us: Region = serde_json::from_str("\"Us\"").unwrap();
        assert_eq!(us, Region::Us);
        assert!(serde_json::from_str::<Region>("\"apac\"").is_err());
        assert_eq!(serde_json::to_string(&Region::Eu).unwrap(), "\"eu\"");
    }
}
