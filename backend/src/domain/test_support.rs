//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::{
    CityId, DiscoveryRadius, GeoPoint, Landmark, LandmarkCategory, LandmarkId, Region, RegionId,
    UnlockThreshold,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 21, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn point(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint::new(latitude, longitude).expect("fixture coordinates are valid")
}

pub(crate) fn landmark_id(seed: u128) -> LandmarkId {
    LandmarkId::from_uuid(Uuid::from_u128(seed))
}

pub(crate) fn landmark_at(
    seed: u128,
    city_id: CityId,
    category: LandmarkCategory,
    location: GeoPoint,
) -> Landmark {
    Landmark {
        id: landmark_id(seed),
        city_id,
        name: format!("Landmark {seed}"),
        description: None,
        category,
        year_established: None,
        location,
        discovery_radius: DiscoveryRadius::default(),
        image_url: None,
        summary: None,
    }
}

pub(crate) fn region(seed: u128, city_id: CityId, threshold: i64) -> Region {
    Region {
        id: RegionId::from_uuid(Uuid::from_u128(seed)),
        city_id,
        name: format!("Region {seed}"),
        boundary: Vec::new(),
        unlock_threshold: UnlockThreshold::new(threshold).expect("fixture threshold is positive"),
    }
}
