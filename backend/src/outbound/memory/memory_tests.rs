//! Tests for the in-memory store.

use chrono::{DateTime, Duration, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    DiscoveryId, DiscoveryMethod, LandmarkCategory, UnlockThreshold, Username,
};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::with_example_data()
}

fn now() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000)
}

fn seeded_landmark(store: &InMemoryStore, name: &str) -> Landmark {
    store
        .lock()
        .expect("store lock")
        .landmarks
        .values()
        .find(|landmark| landmark.name == name)
        .cloned()
        .expect("seeded landmark")
}

fn event(user_id: UserId, landmark_id: LandmarkId, at: DateTime<Utc>) -> DiscoveryEvent {
    DiscoveryEvent {
        id: DiscoveryId::random(),
        user_id,
        landmark_id,
        method: DiscoveryMethod::Manual,
        discovered_at: at,
        reported_location: None,
        xp_earned: 10,
    }
}

#[rstest]
fn example_catalogue_covers_every_known_category(store: InMemoryStore) {
    let state = store.lock().expect("store lock");
    let trondheim: Vec<_> = state
        .landmarks
        .values()
        .filter(|landmark| landmark.city_id == TRONDHEIM)
        .collect();
    assert_eq!(trondheim.len(), 5);
    for category in [
        LandmarkCategory::Historic,
        LandmarkCategory::Military,
        LandmarkCategory::Architecture,
        LandmarkCategory::Culture,
        LandmarkCategory::Royal,
    ] {
        assert!(trondheim.iter().any(|landmark| landmark.category == category));
    }
    assert_eq!(
        state
            .landmarks
            .values()
            .filter(|landmark| landmark.city_id == COLOGNE)
            .count(),
        2
    );
    assert!(state.users.contains_key(&DEMO_USER));
    assert!(
        state
            .regions
            .values()
            .all(|region| region.boundary.first() == region.boundary.last())
    );
}

#[rstest]
#[tokio::test]
async fn duplicate_discovery_insert_is_a_conflict(store: InMemoryStore) {
    let nidaros = seeded_landmark(&store, "Nidaros Cathedral");
    let first = event(DEMO_USER, nidaros.id, now());
    let second = event(DEMO_USER, nidaros.id, now() + Duration::minutes(1));

    let awarded = store
        .insert_and_award(&first)
        .await
        .expect("first insert succeeds")
        .expect("demo explorer exists");
    let err = store
        .insert_and_award(&second)
        .await
        .expect_err("duplicate rejected");

    assert_eq!(awarded.total_xp, 10);
    assert!(matches!(err, DiscoveryRepositoryError::Conflict { .. }));
    let stored = DiscoveryRepository::find(&store, &DEMO_USER, &nidaros.id)
        .await
        .expect("lookup succeeds");
    assert_eq!(stored, Some(first));
    let user = store
        .find_by_id(&DEMO_USER)
        .await
        .expect("lookup succeeds")
        .expect("demo explorer exists");
    assert_eq!(user.total_xp, 10, "conflict leaves the award untouched");
}

#[rstest]
#[tokio::test]
async fn discovery_for_unknown_user_stores_nothing(store: InMemoryStore) {
    let nidaros = seeded_landmark(&store, "Nidaros Cathedral");
    let stranger = UserId::random();

    let outcome = store
        .insert_and_award(&event(stranger, nidaros.id, now()))
        .await
        .expect("insert completes");

    assert!(outcome.is_none());
    assert_eq!(
        store.count_for_user(&stranger).await.expect("count succeeds"),
        0
    );
}

#[test]
fn poisoned_store_refuses_catalogue_load() {
    let store = InMemoryStore::default();
    let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = store.lock().expect("store lock");
        panic!("poison the store");
    }));
    assert!(poisoned.is_err());

    let err = store
        .load_catalogue(example_cities(), example_landmarks(), example_regions())
        .expect_err("poisoned lock is reported");

    assert!(err.contains("poisoned"), "unexpected error: {err}");
}

#[rstest]
#[tokio::test]
async fn counts_and_lists_are_scoped_by_city(store: InMemoryStore) {
    let nidaros = seeded_landmark(&store, "Nidaros Cathedral");
    let fortress = seeded_landmark(&store, "Kristiansten Fortress");
    let cathedral = seeded_landmark(&store, "Cologne Cathedral");
    for (offset, landmark) in [&nidaros, &fortress, &cathedral].into_iter().enumerate() {
        let at = now() + Duration::minutes(i64::try_from(offset).expect("small offset"));
        store
            .insert_and_award(&event(DEMO_USER, landmark.id, at))
            .await
            .expect("insert succeeds");
    }

    assert_eq!(
        store
            .count_for_city(&DEMO_USER, &TRONDHEIM)
            .await
            .expect("count succeeds"),
        2
    );
    assert_eq!(
        store.count_for_user(&DEMO_USER).await.expect("count succeeds"),
        3
    );

    let all = DiscoveryRepository::list_for_user(&store, &DEMO_USER, None)
        .await
        .expect("list succeeds");
    let order: Vec<_> = all.iter().map(|event| event.landmark_id).collect();
    assert_eq!(order, vec![cathedral.id, fortress.id, nidaros.id]);

    let trondheim = DiscoveryRepository::list_for_user(&store, &DEMO_USER, Some(TRONDHEIM))
        .await
        .expect("list succeeds");
    assert_eq!(trondheim.len(), 2);
}

#[rstest]
#[tokio::test]
async fn usernames_are_unique(store: InMemoryStore) {
    let clash = User::register(
        UserId::random(),
        Username::new("demo_user").expect("valid username"),
        now(),
    );

    let err = store.create(&clash).await.expect_err("duplicate username");

    assert_eq!(err, UserRepositoryError::duplicate_username("demo_user"));
}

#[rstest]
#[tokio::test]
async fn apply_xp_accumulates_and_levels(store: InMemoryStore) {
    store.apply_xp(&DEMO_USER, 100).await.expect("award succeeds");
    let user = store
        .apply_xp(&DEMO_USER, 90)
        .await
        .expect("award succeeds")
        .expect("known user");

    assert_eq!(user.total_xp, 190);
    assert_eq!(user.level, 2);
    assert!(
        store
            .apply_xp(&UserId::random(), 5)
            .await
            .expect("award succeeds")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn nearby_prefilter_respects_city_filter(store: InMemoryStore) {
    let centre = GeoPoint::new(63.4305, 10.3951).expect("valid point");

    let near = store
        .list_landmarks_near(centre, 500.0, Some(TRONDHEIM))
        .await
        .expect("prefilter succeeds");
    let elsewhere = store
        .list_landmarks_near(centre, 500.0, Some(COLOGNE))
        .await
        .expect("prefilter succeeds");

    assert!(near.iter().any(|landmark| landmark.name == "Stiftsgården"));
    assert!(near.iter().all(|landmark| landmark.name != "Rockheim Museum"));
    assert!(elsewhere.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_landmarks_filters_by_category_and_sorts_by_name(store: InMemoryStore) {
    let architecture = store
        .list_landmarks(&LandmarkFilter {
            city_id: None,
            category: Some(LandmarkCategory::Architecture),
        })
        .await
        .expect("list succeeds");

    let names: Vec<_> = architecture
        .iter()
        .map(|landmark| landmark.name.as_str())
        .collect();
    assert_eq!(names, vec!["Hohenzollern Bridge", "Old Town Bridge"]);
}

#[rstest]
#[tokio::test]
async fn create_if_absent_keeps_the_first_record(store: InMemoryStore) {
    let first = ProgressRecord::initial(DEMO_USER, TRONDHEIM, 5, now());
    let second = ProgressRecord::initial(DEMO_USER, TRONDHEIM, 9, now() + Duration::hours(1));

    store
        .create_if_absent(&first)
        .await
        .expect("create succeeds");
    let stored = store
        .create_if_absent(&second)
        .await
        .expect("create succeeds");

    assert_eq!(stored, first);
}

#[rstest]
#[tokio::test]
async fn progress_listing_is_per_user_and_ordered_by_city(store: InMemoryStore) {
    let other = UserId::random();
    for record in [
        ProgressRecord::initial(DEMO_USER, COLOGNE, 2, now()),
        ProgressRecord::initial(DEMO_USER, TRONDHEIM, 5, now()),
        ProgressRecord::initial(other, TRONDHEIM, 5, now()),
    ] {
        store.save(&record).await.expect("save succeeds");
    }

    let listed = ProgressRepository::list_for_user(&store, &DEMO_USER)
        .await
        .expect("list succeeds");

    let cities: Vec<_> = listed.iter().map(|record| record.city_id).collect();
    assert_eq!(cities, vec![TRONDHEIM, COLOGNE]);
}

#[rstest]
fn regions_are_loaded_with_positive_thresholds(store: InMemoryStore) {
    let state = store.lock().expect("store lock");
    assert!(
        state
            .regions
            .values()
            .all(|region| region.unlock_threshold >= UnlockThreshold::new(1).expect("valid"))
    );
}
