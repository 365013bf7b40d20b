//! Discovery events: the ledger's immutable facts.
//!
//! At most one [`DiscoveryEvent`] exists per (user, landmark) pair. Stores
//! enforce the uniqueness; the ledger service turns a duplicate insert into a
//! replay of the stored event.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DiscoveryId, GeoPoint, LandmarkId, User, UserId};

/// How the explorer found the landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    Gps,
    ArScan,
    Manual,
}

impl DiscoveryMethod {
    /// Wire label for the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gps => "gps",
            Self::ArScan => "ar_scan",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a discovery method label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("discovery method must be one of gps, ar_scan, manual (got {value:?})")]
pub struct UnknownDiscoveryMethod {
    pub value: String,
}

impl FromStr for DiscoveryMethod {
    type Err = UnknownDiscoveryMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gps" => Ok(Self::Gps),
            "ar_scan" => Ok(Self::ArScan),
            "manual" => Ok(Self::Manual),
            other => Err(UnknownDiscoveryMethod {
                value: other.to_owned(),
            }),
        }
    }
}

/// A recorded discovery. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEvent {
    pub id: DiscoveryId,
    pub user_id: UserId,
    pub landmark_id: LandmarkId,
    pub method: DiscoveryMethod,
    pub discovered_at: DateTime<Utc>,
    pub reported_location: Option<GeoPoint>,
    pub xp_earned: u64,
}

/// Result of a discovery attempt.
///
/// `newly_recorded` is false when the pair was already in the ledger; the
/// stored event is returned unchanged and no experience is awarded.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryOutcome {
    pub event: DiscoveryEvent,
    pub newly_recorded: bool,
    pub user: User,
}

impl DiscoveryOutcome {
    /// Experience granted by this call.
    pub fn xp_awarded(&self) -> u64 {
        if self.newly_recorded {
            self.event.xp_earned
        } else {
            0
        }
    }
}

/// A GPS-triggered discovery paired with the distance that qualified it.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyDiscovery {
    pub outcome: DiscoveryOutcome,
    pub distance_meters: f64,
}

/// Lifetime totals for one explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStats {
    pub total_discoveries: u64,
    pub total_xp: u64,
    pub level: u64,
}
