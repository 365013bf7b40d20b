//! Tests for the discovery ledger service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockCatalogueRepository, MockDiscoveryRepository, MockProgressCommand, MockUserRepository,
};
use crate::domain::test_support::{fixture_clock, fixture_timestamp, landmark_at, point};
use crate::domain::{
    DiscoveryRadius, ErrorCode, GeoPoint, LandmarkCategory, ProgressRecord, Username,
};

type Service = DiscoveryService<
    MockCatalogueRepository,
    MockUserRepository,
    MockDiscoveryRepository,
    MockProgressCommand,
>;

struct Mocks {
    catalogue: MockCatalogueRepository,
    users: MockUserRepository,
    discoveries: MockDiscoveryRepository,
    progress: MockProgressCommand,
}

impl Mocks {
    fn into_service(self) -> Service {
        DiscoveryService::new(
            Arc::new(self.catalogue),
            Arc::new(self.users),
            Arc::new(self.discoveries),
            Arc::new(self.progress),
            fixture_clock(),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        catalogue: MockCatalogueRepository::new(),
        users: MockUserRepository::new(),
        discoveries: MockDiscoveryRepository::new(),
        progress: MockProgressCommand::new(),
    }
}

fn city() -> CityId {
    CityId::from_uuid(Uuid::from_u128(100))
}

fn explorer() -> User {
    User::register(
        UserId::from_uuid(Uuid::from_u128(7)),
        Username::new("explorer").expect("valid username"),
        fixture_timestamp(),
    )
}

fn nidaros() -> Landmark {
    landmark_at(1, city(), LandmarkCategory::Historic, point(63.4270, 10.3969))
}

fn request(landmark: &Landmark) -> RecordDiscoveryRequest {
    RecordDiscoveryRequest {
        user_id: explorer().id,
        landmark_id: landmark.id,
        method: DiscoveryMethod::Manual,
        reported_location: None,
        xp_override: None,
    }
}

fn stored_event(landmark: &Landmark, xp_earned: u64) -> DiscoveryEvent {
    DiscoveryEvent {
        id: DiscoveryId::from_uuid(Uuid::from_u128(900)),
        user_id: explorer().id,
        landmark_id: landmark.id,
        method: DiscoveryMethod::ArScan,
        discovered_at: fixture_timestamp(),
        reported_location: None,
        xp_earned,
    }
}

fn expect_user_exists(users: &mut MockUserRepository) {
    users
        .expect_find_by_id()
        .returning(|_| Ok(Some(explorer())));
}

fn expect_landmark(catalogue: &mut MockCatalogueRepository, landmark: Landmark) {
    catalogue
        .expect_get_landmark()
        .returning(move |_| Ok(Some(landmark.clone())));
}

fn expect_refresh(progress: &mut MockProgressCommand, times: usize) {
    progress.expect_refresh().times(times).returning(|user, city| {
        Ok(ProgressRecord::initial(*user, *city, 5, fixture_timestamp()))
    });
}

#[rstest]
#[tokio::test]
async fn new_discovery_awards_category_experience(mut mocks: Mocks) {
    let landmark = nidaros();
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    mocks.discoveries.expect_find().returning(|_, _| Ok(None));
    mocks
        .discoveries
        .expect_insert_and_award()
        .withf(|event| event.xp_earned == 100 && event.discovered_at == fixture_timestamp())
        .times(1)
        .returning(|event| Ok(Some(explorer().with_xp_added(event.xp_earned))));
    expect_refresh(&mut mocks.progress, 1);

    let outcome = mocks
        .into_service()
        .record_discovery(request(&landmark))
        .await
        .expect("discovery succeeds");

    assert!(outcome.newly_recorded);
    assert_eq!(outcome.xp_awarded(), 100);
    assert_eq!(outcome.user.total_xp, 100);
    assert_eq!(outcome.user.level, 2);
}

#[rstest]
#[tokio::test]
async fn xp_override_replaces_category_award(mut mocks: Mocks) {
    let landmark = nidaros();
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    mocks.discoveries.expect_find().returning(|_, _| Ok(None));
    mocks
        .discoveries
        .expect_insert_and_award()
        .withf(|event| event.xp_earned == 15)
        .returning(|event| Ok(Some(explorer().with_xp_added(event.xp_earned))));
    expect_refresh(&mut mocks.progress, 1);

    let mut req = request(&landmark);
    req.xp_override = Some(15);
    let outcome = mocks
        .into_service()
        .record_discovery(req)
        .await
        .expect("discovery succeeds");

    assert_eq!(outcome.event.xp_earned, 15);
}

#[rstest]
#[tokio::test]
async fn repeated_discovery_replays_without_award(mut mocks: Mocks) {
    let landmark = nidaros();
    let existing = stored_event(&landmark, 100);
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    let returned = existing.clone();
    mocks
        .discoveries
        .expect_find()
        .returning(move |_, _| Ok(Some(returned.clone())));
    mocks.discoveries.expect_insert_and_award().times(0);
    expect_refresh(&mut mocks.progress, 1);

    let outcome = mocks
        .into_service()
        .record_discovery(request(&landmark))
        .await
        .expect("replay succeeds");

    assert!(!outcome.newly_recorded);
    assert_eq!(outcome.xp_awarded(), 0);
    assert_eq!(outcome.event, existing);
}

#[rstest]
#[tokio::test]
async fn insert_conflict_falls_back_to_stored_event(mut mocks: Mocks) {
    let landmark = nidaros();
    let winner = stored_event(&landmark, 100);
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    let mut lookups = 0;
    let returned = winner.clone();
    mocks.discoveries.expect_find().returning(move |_, _| {
        lookups += 1;
        Ok((lookups > 1).then(|| returned.clone()))
    });
    mocks
        .discoveries
        .expect_insert_and_award()
        .times(1)
        .returning(|_| Err(DiscoveryRepositoryError::conflict("duplicate key")));
    expect_refresh(&mut mocks.progress, 1);

    let outcome = mocks
        .into_service()
        .record_discovery(request(&landmark))
        .await
        .expect("conflict is recovered");

    assert!(!outcome.newly_recorded);
    assert_eq!(outcome.event, winner);
}

#[rstest]
#[tokio::test]
async fn user_vanishing_before_award_is_not_found(mut mocks: Mocks) {
    let landmark = nidaros();
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    mocks.discoveries.expect_find().returning(|_, _| Ok(None));
    mocks
        .discoveries
        .expect_insert_and_award()
        .returning(|_| Ok(None));
    expect_refresh(&mut mocks.progress, 0);

    let error = mocks
        .into_service()
        .record_discovery(request(&landmark))
        .await
        .expect_err("user removed mid-request");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn retry_after_failed_refresh_brings_progress_up_to_date(mut mocks: Mocks) {
    let landmark = nidaros();
    let stored = stored_event(&landmark, 100);
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    let mut lookups = 0;
    let returned = stored.clone();
    mocks.discoveries.expect_find().returning(move |_, _| {
        lookups += 1;
        Ok((lookups > 1).then(|| returned.clone()))
    });
    mocks
        .discoveries
        .expect_insert_and_award()
        .times(1)
        .returning(|event| Ok(Some(explorer().with_xp_added(event.xp_earned))));
    let mut refreshes = 0;
    mocks
        .progress
        .expect_refresh()
        .times(2)
        .returning(move |user, city| {
            refreshes += 1;
            if refreshes == 1 {
                Err(Error::service_unavailable("progress store unavailable"))
            } else {
                Ok(ProgressRecord::initial(*user, *city, 5, fixture_timestamp()))
            }
        });
    let service = mocks.into_service();

    let first = service
        .record_discovery(request(&landmark))
        .await
        .expect_err("refresh outage surfaces");
    let retry = service
        .record_discovery(request(&landmark))
        .await
        .expect("retry succeeds");

    assert_eq!(first.code(), ErrorCode::ServiceUnavailable);
    assert!(!retry.newly_recorded);
    assert_eq!(retry.event, stored);
}

#[rstest]
#[tokio::test]
async fn missing_user_is_not_found(mut mocks: Mocks) {
    mocks.users.expect_find_by_id().returning(|_| Ok(None));
    mocks.catalogue.expect_get_landmark().times(0);

    let error = mocks
        .into_service()
        .record_discovery(request(&nidaros()))
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn missing_landmark_is_not_found(mut mocks: Mocks) {
    expect_user_exists(&mut mocks.users);
    mocks.catalogue.expect_get_landmark().returning(|_| Ok(None));
    mocks.discoveries.expect_insert_and_award().times(0);

    let error = mocks
        .into_service()
        .record_discovery(request(&nidaros()))
        .await
        .expect_err("unknown landmark");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn storage_outage_is_service_unavailable(mut mocks: Mocks) {
    let landmark = nidaros();
    expect_user_exists(&mut mocks.users);
    expect_landmark(&mut mocks.catalogue, landmark.clone());
    mocks
        .discoveries
        .expect_find()
        .returning(|_, _| Err(DiscoveryRepositoryError::connection("pool exhausted")));

    let error = mocks
        .into_service()
        .record_discovery(request(&landmark))
        .await
        .expect_err("storage down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

fn with_radius(mut landmark: Landmark, meters: i64) -> Landmark {
    landmark.discovery_radius = DiscoveryRadius::new(meters).expect("positive radius");
    landmark
}

#[rstest]
#[tokio::test]
async fn discover_nearby_records_landmarks_within_their_own_radius(mut mocks: Mocks) {
    let origin: GeoPoint = point(63.4305, 10.3951);
    let stiftsgarden = with_radius(
        landmark_at(5, city(), LandmarkCategory::Royal, point(63.4308, 10.3936)),
        150,
    );
    let old_bridge = with_radius(
        landmark_at(3, city(), LandmarkCategory::Architecture, point(63.4300, 10.4000)),
        30,
    );

    expect_user_exists(&mut mocks.users);
    mocks
        .catalogue
        .expect_max_discovery_radius()
        .returning(|| Ok(Some(DiscoveryRadius::new(500).expect("positive radius"))));
    let candidates = vec![old_bridge, stiftsgarden];
    mocks
        .catalogue
        .expect_list_landmarks_near()
        .withf(|_, radius, city_id| *radius == 200.0 && city_id.is_none())
        .returning(move |_, _, _| Ok(candidates.clone()));
    mocks.discoveries.expect_find().returning(|_, _| Ok(None));
    mocks
        .discoveries
        .expect_insert_and_award()
        .withf(|event| {
            event.method == DiscoveryMethod::Gps
                && event.reported_location.is_some()
                && event.xp_earned == 85
        })
        .times(1)
        .returning(|event| Ok(Some(explorer().with_xp_added(event.xp_earned))));
    expect_refresh(&mut mocks.progress, 1);

    let discovered = mocks
        .into_service()
        .discover_nearby(DiscoverNearbyRequest {
            user_id: explorer().id,
            origin,
            city_id: None,
        })
        .await
        .expect("gps discovery succeeds");

    assert_eq!(discovered.len(), 1);
    assert_eq!(
        discovered[0].outcome.event.landmark_id,
        LandmarkId::from_uuid(Uuid::from_u128(5))
    );
    assert!(discovered[0].distance_meters < 150.0);
}

#[rstest]
#[tokio::test]
async fn discover_nearby_defaults_prefilter_for_empty_catalogue(mut mocks: Mocks) {
    expect_user_exists(&mut mocks.users);
    mocks
        .catalogue
        .expect_max_discovery_radius()
        .returning(|| Ok(None));
    mocks
        .catalogue
        .expect_list_landmarks_near()
        .withf(|_, radius, _| *radius == 50.0)
        .returning(|_, _, _| Ok(Vec::new()));

    let discovered = mocks
        .into_service()
        .discover_nearby(DiscoverNearbyRequest {
            user_id: explorer().id,
            origin: point(0.0, 0.0),
            city_id: Some(city()),
        })
        .await
        .expect("gps discovery succeeds");

    assert!(discovered.is_empty());
}

#[rstest]
#[tokio::test]
async fn stats_combine_user_totals_and_event_count(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_id()
        .returning(|_| Ok(Some(explorer().with_xp_added(190))));
    mocks.discoveries.expect_count_for_user().returning(|_| Ok(2));

    let stats = mocks
        .into_service()
        .discovery_stats(&explorer().id)
        .await
        .expect("stats succeed");

    assert_eq!(
        stats,
        DiscoveryStats {
            total_discoveries: 2,
            total_xp: 190,
            level: 2,
        }
    );
}

#[rstest]
#[tokio::test]
async fn has_discovered_reflects_ledger(mut mocks: Mocks) {
    let landmark = nidaros();
    let event = stored_event(&landmark, 100);
    mocks
        .discoveries
        .expect_find()
        .returning(move |_, _| Ok(Some(event.clone())));

    let found = mocks
        .into_service()
        .has_discovered(&explorer().id, &landmark.id)
        .await
        .expect("lookup succeeds");

    assert!(found);
}
