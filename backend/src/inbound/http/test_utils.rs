//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use rstest::fixture;

use crate::domain::test_support::fixture_clock;
use crate::domain::{DiscoverySettings, LandmarkId};
use crate::inbound::http::state::{HttpState, Repositories};
use crate::inbound::http::validation::{json_config, query_config};
use crate::inbound::http::{configure_api, health::HealthState};
use crate::outbound::memory::{InMemoryStore, example_landmarks};

/// Handlers wired over a seeded in-memory store with a frozen clock.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
}

impl TestContext {
    /// Build an app exposing the full `/api/v1` surface and health probes.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(health)
            .app_data(json_config())
            .app_data(query_config())
            .service(web::scope("/api/v1").configure(configure_api))
            .service(super::health::ready)
            .service(super::health::live)
    }
}

#[fixture]
pub fn test_context() -> TestContext {
    let store = Arc::new(InMemoryStore::with_example_data());
    let state = HttpState::from_repositories(
        Repositories {
            catalogue: Arc::clone(&store),
            users: Arc::clone(&store),
            discoveries: Arc::clone(&store),
            progress: Arc::clone(&store),
        },
        fixture_clock(),
        DiscoverySettings::default(),
    );
    TestContext { store, state }
}

fn seeded_landmark(name: &str) -> LandmarkId {
    example_landmarks()
        .into_iter()
        .find(|landmark| landmark.name == name)
        .map(|landmark| landmark.id)
        .expect("landmark is seeded")
}

/// Historic landmark in Trondheim worth 100 XP.
pub fn nidaros_id() -> LandmarkId {
    seeded_landmark("Nidaros Cathedral")
}

/// Architecture landmark in Cologne worth 80 XP.
pub fn hohenzollern_id() -> LandmarkId {
    seeded_landmark("Hohenzollern Bridge")
}
