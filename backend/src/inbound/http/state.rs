//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on the driving
//! ports, so they stay testable without any storage.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    CatalogueRepository, DiscoveryCommand, DiscoveryQuery, DiscoveryRepository,
    FixtureDiscoveryCommand, FixtureDiscoveryQuery, FixtureLandmarkQuery, FixtureProgressCommand,
    FixtureProgressQuery, FixtureUserCommand, FixtureUserQuery, LandmarkQuery, ProgressCommand,
    ProgressQuery, ProgressRepository, UserCommand, UserQuery, UserRepository,
};
use crate::domain::{
    DiscoveryService, DiscoverySettings, LandmarkService, ProgressService, UserService,
};

/// Driven adapters the services are built over.
pub struct Repositories<C, U, D, R> {
    pub catalogue: Arc<C>,
    pub users: Arc<U>,
    pub discoveries: Arc<D>,
    pub progress: Arc<R>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub discoveries: Arc<dyn DiscoveryCommand>,
    pub discoveries_query: Arc<dyn DiscoveryQuery>,
    pub landmarks: Arc<dyn LandmarkQuery>,
    pub progress: Arc<dyn ProgressCommand>,
    pub progress_query: Arc<dyn ProgressQuery>,
}

impl HttpState {
    /// State backed entirely by fixture ports.
    ///
    /// # Examples
    /// ```
    /// use explorer::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixtures();
    /// let _landmarks = state.landmarks.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            users: Arc::new(FixtureUserCommand),
            users_query: Arc::new(FixtureUserQuery),
            discoveries: Arc::new(FixtureDiscoveryCommand),
            discoveries_query: Arc::new(FixtureDiscoveryQuery),
            landmarks: Arc::new(FixtureLandmarkQuery),
            progress: Arc::new(FixtureProgressCommand),
            progress_query: Arc::new(FixtureProgressQuery),
        }
    }

    /// Wire the domain services over one set of driven adapters.
    ///
    /// The discovery ledger refreshes progress through the same
    /// `ProgressService` instance the progress endpoints use.
    pub fn from_repositories<C, U, D, R>(
        repositories: Repositories<C, U, D, R>,
        clock: Arc<dyn Clock>,
        settings: DiscoverySettings,
    ) -> Self
    where
        C: CatalogueRepository + 'static,
        U: UserRepository + 'static,
        D: DiscoveryRepository + 'static,
        R: ProgressRepository + 'static,
    {
        let Repositories {
            catalogue,
            users,
            discoveries,
            progress,
        } = repositories;

        let progress_service = Arc::new(ProgressService::new(
            Arc::clone(&catalogue),
            Arc::clone(&users),
            Arc::clone(&discoveries),
            progress,
            Arc::clone(&clock),
        ));
        let discovery_service = Arc::new(
            DiscoveryService::new(
                Arc::clone(&catalogue),
                Arc::clone(&users),
                discoveries,
                Arc::clone(&progress_service),
                Arc::clone(&clock),
            )
            .with_settings(settings),
        );
        let user_service = Arc::new(UserService::new(users, clock));
        let landmark_service = Arc::new(LandmarkService::new(catalogue));

        Self {
            users: user_service.clone(),
            users_query: user_service,
            discoveries: discovery_service.clone(),
            discoveries_query: discovery_service,
            landmarks: landmark_service,
            progress: progress_service.clone(),
            progress_query: progress_service,
        }
    }
}
