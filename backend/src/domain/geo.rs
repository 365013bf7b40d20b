//! Great-circle geometry for proximity matching.
//!
//! Distances use the haversine formula on a spherical Earth. The formula is
//! the contract: storage adapters may narrow candidates with a
//! [`BoundingBox`] prefilter, but [`find_nearby`] always re-checks the exact
//! distance before a landmark counts as nearby.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Landmark;

/// Mean Earth radius used by the haversine formula, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Validation errors raised by [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoValidationError {
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
}

impl fmt::Display for GeoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be within [-90, 90] (got {value})")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be within [-180, 180] (got {value})")
            }
        }
    }
}

impl std::error::Error for GeoValidationError {}

/// A WGS84 coordinate pair in decimal degrees.
///
/// # Examples
/// ```
/// use explorer::domain::GeoPoint;
///
/// let nidaros = GeoPoint::new(63.4270, 10.3969).expect("valid coordinates");
/// assert_eq!(nidaros.latitude(), 63.4270);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoPointDto", into = "GeoPointDto")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct GeoPointDto {
    latitude: f64,
    longitude: f64,
}

impl From<GeoPoint> for GeoPointDto {
    fn from(value: GeoPoint) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl TryFrom<GeoPointDto> for GeoPoint {
    type Error = GeoValidationError;

    fn try_from(value: GeoPointDto) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude)
    }
}

/// Great-circle distance between two points in metres.
///
/// The `asin` argument is clamped to `[-1, 1]` so antipodal points and the
/// poles never yield `NaN`.
///
/// # Examples
/// ```
/// use explorer::domain::{GeoPoint, distance_meters};
///
/// let a = GeoPoint::new(63.4270, 10.3969).expect("valid");
/// let b = GeoPoint::new(63.4305, 10.3951).expect("valid");
/// let metres = distance_meters(a, b);
/// assert!((350.0..=450.0).contains(&metres));
/// ```
pub fn distance_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * half_chord.max(0.0).sqrt().clamp(-1.0, 1.0).asin();

    EARTH_RADIUS_METERS * central_angle
}

/// A landmark matched by proximity, paired with its exact distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyLandmark {
    pub landmark: Landmark,
    pub distance_meters: f64,
}

impl NearbyLandmark {
    /// Latitude of the matched landmark.
    pub fn latitude(&self) -> f64 {
        self.landmark.location.latitude()
    }

    /// Longitude of the matched landmark.
    pub fn longitude(&self) -> f64 {
        self.landmark.location.longitude()
    }
}

/// Return every candidate within `radius_meters` of `origin`.
///
/// Results are ordered by ascending distance, ties broken by landmark id so
/// the output is deterministic. Candidates may come from an approximate
/// storage prefilter or from an in-memory list; each one is re-verified here.
///
/// # Examples
/// ```
/// use explorer::domain::{GeoPoint, find_nearby};
///
/// let origin = GeoPoint::new(63.4305, 10.3951).expect("valid");
/// assert!(find_nearby(origin, 100.0, Vec::new()).is_empty());
/// ```
pub fn find_nearby<I>(origin: GeoPoint, radius_meters: f64, candidates: I) -> Vec<NearbyLandmark>
where
    I: IntoIterator<Item = Landmark>,
{
    let mut matches: Vec<NearbyLandmark> = candidates
        .into_iter()
        .filter_map(|landmark| {
            let distance = distance_meters(origin, landmark.location);
            (distance <= radius_meters).then_some(NearbyLandmark {
                landmark,
                distance_meters: distance,
            })
        })
        .collect();

    matches.sort_by(|left, right| {
        left.distance_meters
            .total_cmp(&right.distance_meters)
            .then_with(|| left.landmark.id.cmp(&right.landmark.id))
    });
    matches
}

/// Latitude/longitude rectangle enclosing a search circle.
///
/// Used by storage adapters as an index-friendly prefilter. The box is a
/// superset of the circle; callers still filter with [`find_nearby`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Build the box around `origin` covering `radius_meters`.
    ///
    /// Near the poles, or when the box would wrap the antimeridian, the
    /// longitude span widens to the full `[-180, 180]` range.
    pub fn around(origin: GeoPoint, radius_meters: f64) -> Self {
        let angular = (radius_meters.max(0.0) / EARTH_RADIUS_METERS).to_degrees();
        let min_latitude = (origin.latitude - angular).max(-90.0);
        let max_latitude = (origin.latitude + angular).min(90.0);

        let cos_lat = origin.latitude.to_radians().cos();
        let full_span = min_latitude <= -90.0 || max_latitude >= 90.0 || cos_lat < 1e-6;
        let lon_delta = if full_span { 180.0 } else { angular / cos_lat };
        let min_longitude = origin.longitude - lon_delta;
        let max_longitude = origin.longitude + lon_delta;

        if full_span || min_longitude < -180.0 || max_longitude > 180.0 {
            return Self {
                min_latitude,
                max_latitude,
                min_longitude: -180.0,
                max_longitude: 180.0,
            };
        }

        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    /// Whether the point lies inside the box, edges included.
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

#[cfg(test)]
#[path = "geo_tests.rs"]
mod tests;
