//! Strongly typed identifiers for explorers, catalogue entries, and events.
//!
//! Every identifier is a UUID underneath. Distinct newtypes keep a landmark id
//! from being passed where a city id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID (got {value:?})")]
pub struct IdParseError {
    kind: &'static str,
    value: String,
}

impl IdParseError {
    /// Name of the identifier kind that failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value).map(Self).map_err(|_| IdParseError {
                    kind: $kind,
                    value: value.to_owned(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of an explorer (player account).
    UserId,
    "userId"
);
uuid_identifier!(
    /// Identifier of a city in the catalogue.
    CityId,
    "cityId"
);
uuid_identifier!(
    /// Identifier of a landmark in the catalogue.
    LandmarkId,
    "landmarkId"
);
uuid_identifier!(
    /// Identifier of an unlockable city region.
    RegionId,
    "regionId"
);
uuid_identifier!(
    /// Identifier of a recorded discovery event.
    DiscoveryId,
    "discoveryId"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_canonical_uuid() {
        let id: LandmarkId = "00000000-0000-0000-0000-000000000042"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000042");
    }

    #[rstest]
    fn parse_error_names_the_identifier_kind() {
        let err = "nope".parse::<CityId>().expect_err("invalid uuid");
        assert_eq!(err.kind(), "cityId");
        assert!(err.to_string().contains("nope"));
    }

    #[rstest]
    fn serialises_as_bare_uuid_string() {
        let id = UserId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialises");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
