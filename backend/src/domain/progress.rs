//! Per-city progress records and their pure recomputation.
//!
//! A [`ProgressRecord`] is a cache. [`compute_progress`] rebuilds it from the
//! discovered count, the city's landmark count, and its regions; nothing
//! updates the counters incrementally.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CityId, Region, RegionId, UserId};

/// Derived completion summary for one (user, city) pair.
///
/// ## Invariants
/// - `unlocked_region_ids` holds exactly the regions whose threshold is met
///   by `landmarks_discovered` as of `last_computed_at`.
/// - `last_computed_at` is `None` until the first refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub city_id: CityId,
    pub landmarks_discovered: u64,
    pub total_landmarks: u64,
    pub unlocked_region_ids: BTreeSet<RegionId>,
    pub created_at: DateTime<Utc>,
    pub last_computed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// A record in the initialised state: nothing discovered, no regions.
    pub fn initial(
        user_id: UserId,
        city_id: CityId,
        total_landmarks: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            city_id,
            landmarks_discovered: 0,
            total_landmarks,
            unlocked_region_ids: BTreeSet::new(),
            created_at,
            last_computed_at: None,
        }
    }

    /// Whether the record has been through at least one refresh.
    pub fn is_refreshed(&self) -> bool {
        self.last_computed_at.is_some()
    }
}

/// Source facts for one recomputation.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInputs<'a> {
    pub landmarks_discovered: u64,
    pub total_landmarks: u64,
    pub regions: &'a [Region],
    pub computed_at: DateTime<Utc>,
}

/// Recompute a progress record from source facts.
///
/// `previous` only contributes its `created_at`; every derived field is
/// rebuilt, so redundant or concurrent refreshes converge.
///
/// Region unlocks depend on the discovered count alone. Regions belonging to
/// other cities are ignored.
pub fn compute_progress(
    user_id: UserId,
    city_id: CityId,
    previous: Option<&ProgressRecord>,
    inputs: ProgressInputs<'_>,
) -> ProgressRecord {
    let unlocked_region_ids = inputs
        .regions
        .iter()
        .filter(|region| region.city_id == city_id)
        .filter(|region| region.unlock_threshold.is_met_by(inputs.landmarks_discovered))
        .map(|region| region.id)
        .collect();

    ProgressRecord {
        user_id,
        city_id,
        landmarks_discovered: inputs.landmarks_discovered,
        total_landmarks: inputs.total_landmarks,
        unlocked_region_ids,
        created_at: previous.map_or(inputs.computed_at, |record| record.created_at),
        last_computed_at: Some(inputs.computed_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{fixture_timestamp, region};
    use chrono::Duration;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn city() -> CityId {
        CityId::from_uuid(Uuid::from_u128(10))
    }

    #[fixture]
    fn regions(city: CityId) -> Vec<Region> {
        vec![region(21, city, 1), region(22, city, 2), region(23, city, 4)]
    }

    fn inputs(discovered: u64, regions: &[Region]) -> ProgressInputs<'_> {
        ProgressInputs {
            landmarks_discovered: discovered,
            total_landmarks: 5,
            regions,
            computed_at: fixture_timestamp(),
        }
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(1, vec![21])]
    #[case(2, vec![21, 22])]
    #[case(3, vec![21, 22])]
    #[case(5, vec![21, 22, 23])]
    fn unlocks_regions_whose_threshold_is_met(
        city: CityId,
        regions: Vec<Region>,
        #[case] discovered: u64,
        #[case] expected: Vec<u128>,
    ) {
        let record = compute_progress(UserId::random(), city, None, inputs(discovered, &regions));

        let expected: BTreeSet<RegionId> = expected
            .into_iter()
            .map(|seed| RegionId::from_uuid(Uuid::from_u128(seed)))
            .collect();
        assert_eq!(record.unlocked_region_ids, expected);
        assert_eq!(record.landmarks_discovered, discovered);
        assert_eq!(record.total_landmarks, 5);
    }

    #[rstest]
    fn ignores_regions_of_other_cities(city: CityId) {
        let elsewhere = CityId::from_uuid(Uuid::from_u128(11));
        let regions = vec![region(31, elsewhere, 1)];

        let record = compute_progress(UserId::random(), city, None, inputs(3, &regions));

        assert!(record.unlocked_region_ids.is_empty());
    }

    #[rstest]
    fn keeps_creation_time_and_stamps_computation(city: CityId, regions: Vec<Region>) {
        let user = UserId::random();
        let created = fixture_timestamp() - Duration::days(3);
        let previous = ProgressRecord::initial(user, city, 4, created);

        let record = compute_progress(user, city, Some(&previous), inputs(1, &regions));

        assert_eq!(record.created_at, created);
        assert_eq!(record.last_computed_at, Some(fixture_timestamp()));
        assert!(record.is_refreshed());
        assert!(!previous.is_refreshed());
    }

    #[rstest]
    fn recomputation_is_idempotent(city: CityId, regions: Vec<Region>) {
        let user = UserId::random();
        let first = compute_progress(user, city, None, inputs(2, &regions));
        let second = compute_progress(user, city, Some(&first), inputs(2, &regions));
        assert_eq!(first, second);
    }
}
