//! City, landmark, and region reference data.
//!
//! The catalogue is owned by an external collaborator; the engine only reads
//! it. Types here validate the few invariants the engine relies on: a
//! positive discovery radius and a positive region unlock threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CityId, GeoPoint, LandmarkId, RegionId};

/// Landmark category label.
///
/// Parsing never fails: labels outside the known set become
/// [`LandmarkCategory::Other`] and earn the default experience award.
///
/// # Examples
/// ```
/// use explorer::domain::LandmarkCategory;
///
/// let known: LandmarkCategory = "Royal".parse().expect("infallible");
/// assert_eq!(known, LandmarkCategory::Royal);
/// let other: LandmarkCategory = "Maritime".parse().expect("infallible");
/// assert_eq!(other.to_string(), "Maritime");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LandmarkCategory {
    Historic,
    Military,
    Architecture,
    Culture,
    Royal,
    Other(String),
}

impl LandmarkCategory {
    /// Canonical label as stored in the catalogue.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Historic => "Historic",
            Self::Military => "Military",
            Self::Architecture => "Architecture",
            Self::Culture => "Culture",
            Self::Royal => "Royal",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl fmt::Display for LandmarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandmarkCategory {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value.to_owned()))
    }
}

impl From<String> for LandmarkCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Historic" => Self::Historic,
            "Military" => Self::Military,
            "Architecture" => Self::Architecture,
            "Culture" => Self::Culture,
            "Royal" => Self::Royal,
            _ => Self::Other(value),
        }
    }
}

impl From<LandmarkCategory> for String {
    fn from(value: LandmarkCategory) -> Self {
        match value {
            LandmarkCategory::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

/// Validation errors raised by catalogue constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueValidationError {
    NonPositiveDiscoveryRadius { value: i64 },
    NonPositiveUnlockThreshold { value: i64 },
}

impl fmt::Display for CatalogueValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDiscoveryRadius { value } => {
                write!(f, "discovery radius must be positive (got {value})")
            }
            Self::NonPositiveUnlockThreshold { value } => {
                write!(f, "region unlock threshold must be positive (got {value})")
            }
        }
    }
}

impl std::error::Error for CatalogueValidationError {}

/// Proximity threshold for GPS discovery, in whole metres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DiscoveryRadius(u32);

/// Radius applied when the catalogue does not specify one.
pub const DEFAULT_DISCOVERY_RADIUS_METERS: u32 = 50;

impl DiscoveryRadius {
    /// Validate a radius read from storage or request input.
    pub fn new(meters: i64) -> Result<Self, CatalogueValidationError> {
        u32::try_from(meters)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(CatalogueValidationError::NonPositiveDiscoveryRadius { value: meters })
    }

    /// Radius in metres.
    pub fn meters(self) -> u32 {
        self.0
    }
}

impl Default for DiscoveryRadius {
    fn default() -> Self {
        Self(DEFAULT_DISCOVERY_RADIUS_METERS)
    }
}

impl TryFrom<i64> for DiscoveryRadius {
    type Error = CatalogueValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscoveryRadius> for i64 {
    fn from(value: DiscoveryRadius) -> Self {
        Self::from(value.0)
    }
}

/// A discoverable point of interest belonging to one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub id: LandmarkId,
    pub city_id: CityId,
    pub name: String,
    pub description: Option<String>,
    pub category: LandmarkCategory,
    pub year_established: Option<i32>,
    pub location: GeoPoint,
    pub discovery_radius: DiscoveryRadius,
    pub image_url: Option<String>,
    pub summary: Option<String>,
}

/// A named area owning landmarks and regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub country: String,
    pub center: GeoPoint,
}

/// Number of discovered landmarks needed to unlock a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UnlockThreshold(u32);

impl UnlockThreshold {
    /// Validate a threshold read from storage.
    pub fn new(count: i64) -> Result<Self, CatalogueValidationError> {
        u32::try_from(count)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(CatalogueValidationError::NonPositiveUnlockThreshold { value: count })
    }

    /// Threshold as a landmark count.
    pub fn count(self) -> u64 {
        u64::from(self.0)
    }

    /// Whether `discovered` landmarks satisfy the threshold.
    pub fn is_met_by(self, discovered: u64) -> bool {
        self.count() <= discovered
    }
}

impl TryFrom<i64> for UnlockThreshold {
    type Error = CatalogueValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UnlockThreshold> for i64 {
    fn from(value: UnlockThreshold) -> Self {
        Self::from(value.0)
    }
}

/// An unlockable sub-area of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    pub city_id: CityId,
    pub name: String,
    /// Closed polygon ring, first point repeated last.
    pub boundary: Vec<GeoPoint>,
    pub unlock_threshold: UnlockThreshold,
}
