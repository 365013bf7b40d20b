//! Example catalogue for local runs: Trondheim and Cologne.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    City, CityId, DiscoveryRadius, GeoPoint, Landmark, LandmarkCategory, LandmarkId, Region,
    RegionId, UnlockThreshold, User, UserId, Username,
};

pub const TRONDHEIM: CityId =
    CityId::from_uuid(Uuid::from_u128(0x5f1c_0a4e_7b2d_4c11_9e3a_0000_0000_0001));
pub const COLOGNE: CityId =
    CityId::from_uuid(Uuid::from_u128(0x5f1c_0a4e_7b2d_4c11_9e3a_0000_0000_0002));
pub const DEMO_USER: UserId =
    UserId::from_uuid(Uuid::from_u128(0x3b8e_2d17_41c6_4f0a_8d55_0000_0000_0001));

const fn landmark_id(n: u128) -> LandmarkId {
    LandmarkId::from_uuid(Uuid::from_u128(0x9a27_6c3f_1e84_4b9d_a6f0_0000_0000_0000 + n))
}

const fn region_id(n: u128) -> RegionId {
    RegionId::from_uuid(Uuid::from_u128(0x1d4b_83e2_5a07_4e6c_b2f9_0000_0000_0000 + n))
}

fn geo(latitude: f64, longitude: f64) -> Option<GeoPoint> {
    GeoPoint::new(latitude, longitude).ok()
}

struct LandmarkSeed {
    id: LandmarkId,
    city_id: CityId,
    name: &'static str,
    description: &'static str,
    category: LandmarkCategory,
    year: i32,
    latitude: f64,
    longitude: f64,
    radius: i64,
    summary: &'static str,
}

impl LandmarkSeed {
    fn build(self) -> Option<Landmark> {
        Some(Landmark {
            id: self.id,
            city_id: self.city_id,
            name: self.name.to_owned(),
            description: Some(self.description.to_owned()),
            category: self.category,
            year_established: Some(self.year),
            location: geo(self.latitude, self.longitude)?,
            discovery_radius: DiscoveryRadius::new(self.radius).ok()?,
            image_url: None,
            summary: Some(self.summary.to_owned()),
        })
    }
}

/// Trondheim and Cologne.
pub fn example_cities() -> Vec<City> {
    [
        (TRONDHEIM, "Trondheim", "Norway", 63.4305, 10.3951),
        (COLOGNE, "Cologne", "Germany", 50.9375, 6.9603),
    ]
    .into_iter()
    .filter_map(|(id, name, country, latitude, longitude)| {
        Some(City {
            id,
            name: name.to_owned(),
            country: country.to_owned(),
            center: geo(latitude, longitude)?,
        })
    })
    .collect()
}

/// Five Trondheim landmarks, one per known category, and two in Cologne.
pub fn example_landmarks() -> Vec<Landmark> {
    vec![
        LandmarkSeed {
            id: landmark_id(1),
            city_id: TRONDHEIM,
            name: "Nidaros Cathedral",
            description: "Norway's national sanctuary and coronation church",
            category: LandmarkCategory::Historic,
            year: 1070,
            latitude: 63.4270,
            longitude: 10.3969,
            radius: 50,
            summary: "Gothic cathedral raised over the grave of St. Olav; its west front carries more than fifty sculptures.",
        },
        LandmarkSeed {
            id: landmark_id(2),
            city_id: TRONDHEIM,
            name: "Kristiansten Fortress",
            description: "Historic fortress overlooking Trondheim",
            category: LandmarkCategory::Military,
            year: 1681,
            latitude: 63.4286,
            longitude: 10.4147,
            radius: 50,
            summary: "Built after the city fire of 1681 and held against Swedish forces in 1718.",
        },
        LandmarkSeed {
            id: landmark_id(3),
            city_id: TRONDHEIM,
            name: "Old Town Bridge",
            description: "Red bridge linking the city centre with Bakklandet",
            category: LandmarkCategory::Architecture,
            year: 1861,
            latitude: 63.4300,
            longitude: 10.4000,
            radius: 30,
            summary: "Gamle Bybro, nicknamed the Gateway to Happiness.",
        },
        LandmarkSeed {
            id: landmark_id(4),
            city_id: TRONDHEIM,
            name: "Rockheim Museum",
            description: "Norway's national museum of pop and rock music",
            category: LandmarkCategory::Culture,
            year: 2010,
            latitude: 63.4378,
            longitude: 10.4011,
            radius: 50,
            summary: "Interactive exhibits covering Norwegian music from the 1950s onwards.",
        },
        LandmarkSeed {
            id: landmark_id(5),
            city_id: TRONDHEIM,
            name: "Stiftsgården",
            description: "One of Scandinavia's largest wooden buildings",
            category: LandmarkCategory::Royal,
            year: 1778,
            latitude: 63.4308,
            longitude: 10.3936,
            radius: 50,
            summary: "Royal residence used by the Norwegian royal family when visiting Trondheim.",
        },
        LandmarkSeed {
            id: landmark_id(6),
            city_id: COLOGNE,
            name: "Cologne Cathedral",
            description: "Gothic cathedral and UNESCO World Heritage Site",
            category: LandmarkCategory::Historic,
            year: 1248,
            latitude: 50.9413,
            longitude: 6.9582,
            radius: 50,
            summary: "High Gothic cathedral begun in 1248 and finished six centuries later.",
        },
        LandmarkSeed {
            id: landmark_id(7),
            city_id: COLOGNE,
            name: "Hohenzollern Bridge",
            description: "Rhine bridge famous for its love locks",
            category: LandmarkCategory::Architecture,
            year: 1911,
            latitude: 50.9414,
            longitude: 6.9653,
            radius: 50,
            summary: "Railway and footbridge over the Rhine hung with thousands of padlocks.",
        },
    ]
    .into_iter()
    .filter_map(LandmarkSeed::build)
    .collect()
}

fn ring(corners: [(f64, f64); 4]) -> Vec<GeoPoint> {
    corners
        .iter()
        .chain(corners.first())
        .filter_map(|&(latitude, longitude)| geo(latitude, longitude))
        .collect()
}

/// Unlockable regions: three in Trondheim, one in Cologne.
pub fn example_regions() -> Vec<Region> {
    [
        (
            region_id(1),
            TRONDHEIM,
            "Midtbyen",
            1,
            [(63.4260, 10.3900), (63.4260, 10.4020), (63.4350, 10.4020), (63.4350, 10.3900)],
        ),
        (
            region_id(2),
            TRONDHEIM,
            "Bakklandet",
            2,
            [(63.4250, 10.4000), (63.4250, 10.4100), (63.4320, 10.4100), (63.4320, 10.4000)],
        ),
        (
            region_id(3),
            TRONDHEIM,
            "Kristiansten Heights",
            4,
            [(63.4260, 10.4100), (63.4260, 10.4200), (63.4310, 10.4200), (63.4310, 10.4100)],
        ),
        (
            region_id(4),
            COLOGNE,
            "Altstadt-Nord",
            1,
            [(50.9370, 6.9500), (50.9370, 6.9700), (50.9450, 6.9700), (50.9450, 6.9500)],
        ),
    ]
    .into_iter()
    .filter_map(|(id, city_id, name, threshold, corners)| {
        Some(Region {
            id,
            city_id,
            name: name.to_owned(),
            boundary: ring(corners),
            unlock_threshold: UnlockThreshold::new(threshold).ok()?,
        })
    })
    .collect()
}

/// Explorer present in seeded stores, with no discoveries.
pub(super) fn demo_user() -> Option<User> {
    let username = Username::new("demo_user").ok()?;
    Some(User::register(DEMO_USER, username, DateTime::<Utc>::UNIX_EPOCH))
}
