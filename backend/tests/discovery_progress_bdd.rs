//! Behavioural tests for the discovery ledger and progress aggregator.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use explorer::domain::ports::{DiscoverNearbyRequest, RecordDiscoveryRequest};
use explorer::domain::{
    CityId, DiscoveryMethod, DiscoveryOutcome, DiscoverySettings, GeoPoint, ProgressRecord,
    Region, UserId, Username,
};
use explorer::inbound::http::state::{HttpState, Repositories};
use explorer::outbound::memory::{
    InMemoryStore, example_cities, example_landmarks, example_regions,
};
use mockable::MockClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct ExplorerWorld {
    runtime: Runtime,
    state: Option<HttpState>,
    explorer: Option<UserId>,
    last_outcome: Option<DiscoveryOutcome>,
    last_progress: Option<ProgressRecord>,
}

type SharedWorld = Arc<Mutex<ExplorerWorld>>;

impl ExplorerWorld {
    fn state(&self) -> &HttpState {
        self.state.as_ref().expect("catalogue loaded")
    }

    fn explorer(&self) -> UserId {
        self.explorer.expect("explorer registered")
    }
}

fn frozen_clock() -> Arc<MockClock> {
    let now = Utc
        .with_ymd_and_hms(2026, 6, 21, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    Arc::new(clock)
}

fn city_named(name: &str) -> CityId {
    example_cities()
        .into_iter()
        .find(|city| city.name == name)
        .map(|city| city.id)
        .expect("city is seeded")
}

fn region_named(name: &str) -> Region {
    example_regions()
        .into_iter()
        .find(|region| region.name == name)
        .expect("region is seeded")
}

#[fixture]
fn world() -> SharedWorld {
    Arc::new(Mutex::new(ExplorerWorld {
        runtime: Runtime::new().expect("tokio runtime should initialise"),
        state: None,
        explorer: None,
        last_outcome: None,
        last_progress: None,
    }))
}

#[given("the example catalogue")]
fn the_example_catalogue(world: SharedWorld) {
    let store = Arc::new(InMemoryStore::with_example_data());
    let state = HttpState::from_repositories(
        Repositories {
            catalogue: Arc::clone(&store),
            users: Arc::clone(&store),
            discoveries: Arc::clone(&store),
            progress: store,
        },
        frozen_clock(),
        DiscoverySettings::default(),
    );
    world.lock().expect("world lock").state = Some(state);
}

#[given("a registered explorer named \"{name}\"")]
fn a_registered_explorer_named(world: SharedWorld, name: String) {
    let mut ctx = world.lock().expect("world lock");
    let users = Arc::clone(&ctx.state().users);
    let username = Username::new(name).expect("valid username");
    let user = ctx
        .runtime
        .block_on(users.register_user(username))
        .expect("registration succeeds");
    ctx.explorer = Some(user.id);
}

#[when("the explorer discovers \"{landmark}\"")]
fn the_explorer_discovers(world: SharedWorld, landmark: String) {
    let mut ctx = world.lock().expect("world lock");
    let landmark_id = example_landmarks()
        .into_iter()
        .find(|candidate| candidate.name == landmark)
        .map(|candidate| candidate.id)
        .expect("landmark is seeded");
    let request = RecordDiscoveryRequest {
        user_id: ctx.explorer(),
        landmark_id,
        method: DiscoveryMethod::ArScan,
        reported_location: None,
        xp_override: None,
    };
    let discoveries = Arc::clone(&ctx.state().discoveries);
    let outcome = ctx
        .runtime
        .block_on(discoveries.record_discovery(request))
        .expect("discovery succeeds");
    ctx.last_outcome = Some(outcome);
}

#[when("the explorer reports a GPS fix at {latitude}, {longitude}")]
fn the_explorer_reports_a_gps_fix(world: SharedWorld, latitude: f64, longitude: f64) {
    let ctx = world.lock().expect("world lock");
    let request = DiscoverNearbyRequest {
        user_id: ctx.explorer(),
        origin: GeoPoint::new(latitude, longitude).expect("valid fix"),
        city_id: None,
    };
    let discoveries = Arc::clone(&ctx.state().discoveries);
    let found = ctx
        .runtime
        .block_on(discoveries.discover_nearby(request))
        .expect("gps discovery succeeds");
    assert!(!found.is_empty(), "fix should be within a discovery radius");
}

#[then("the explorer has {xp} experience at level {level}")]
fn the_explorer_has_experience_at_level(world: SharedWorld, xp: u64, level: u64) {
    let ctx = world.lock().expect("world lock");
    let users = Arc::clone(&ctx.state().users_query);
    let user = ctx
        .runtime
        .block_on(users.get_user(&ctx.explorer()))
        .expect("explorer exists");
    assert_eq!(user.total_xp, xp);
    assert_eq!(user.level, level);
}

#[then("the last discovery was a replay awarding {xp} experience")]
fn the_last_discovery_was_a_replay(world: SharedWorld, xp: u64) {
    let ctx = world.lock().expect("world lock");
    let outcome = ctx.last_outcome.as_ref().expect("a discovery was made");
    assert!(!outcome.newly_recorded);
    assert_eq!(outcome.xp_awarded(), xp);
}

#[then("the explorer has {count} recorded discoveries")]
fn the_explorer_has_recorded_discoveries(world: SharedWorld, count: usize) {
    let ctx = world.lock().expect("world lock");
    let query = Arc::clone(&ctx.state().discoveries_query);
    let events = ctx
        .runtime
        .block_on(query.list_discoveries(&ctx.explorer(), None))
        .expect("listing succeeds");
    assert_eq!(events.len(), count);
}

#[then("{city} progress shows {discovered} of {total} landmarks discovered")]
fn progress_shows(world: SharedWorld, city: String, discovered: u64, total: u64) {
    let mut ctx = world.lock().expect("world lock");
    let progress = Arc::clone(&ctx.state().progress);
    let city_id = city_named(&city);
    let explorer = ctx.explorer();
    let record = ctx
        .runtime
        .block_on(progress.refresh(&explorer, &city_id))
        .expect("refresh succeeds");
    assert_eq!(record.landmarks_discovered, discovered);
    assert_eq!(record.total_landmarks, total);
    ctx.last_progress = Some(record);
}

#[then("the region \"{region}\" is unlocked")]
fn the_region_is_unlocked(world: SharedWorld, region: String) {
    let ctx = world.lock().expect("world lock");
    let record = ctx.last_progress.as_ref().expect("progress was checked");
    let region = region_named(&region);
    assert!(record.unlocked_region_ids.contains(&region.id));
    assert!(region.unlock_threshold.is_met_by(record.landmarks_discovered));
}

#[then("the region \"{region}\" is locked")]
fn the_region_is_locked(world: SharedWorld, region: String) {
    let ctx = world.lock().expect("world lock");
    let record = ctx.last_progress.as_ref().expect("progress was checked");
    let region = region_named(&region);
    assert!(!record.unlocked_region_ids.contains(&region.id));
}

#[scenario(
    path = "tests/features/discovery_progress.feature",
    name = "Discovering two Trondheim landmarks levels up and unlocks a region"
)]
fn discovering_two_landmarks_levels_up(world: SharedWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/discovery_progress.feature",
    name = "Rediscovering a landmark changes nothing"
)]
fn rediscovering_changes_nothing(world: SharedWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/discovery_progress.feature",
    name = "GPS discovery records every landmark in range"
)]
fn gps_discovery_records_landmarks_in_range(world: SharedWorld) {
    drop(world);
}
