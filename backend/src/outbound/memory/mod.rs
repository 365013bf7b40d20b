//! In-process adapter implementing every driven port.
//!
//! Used when no database is configured and by the HTTP and behavioural
//! tests. One mutex guards all state, so the (user, landmark) uniqueness
//! check and the insert happen atomically, as does each experience award.

mod seed;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, DiscoveryRepository, DiscoveryRepositoryError,
    LandmarkFilter, ProgressRepository, ProgressRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    BoundingBox, City, CityId, DiscoveryEvent, DiscoveryRadius, GeoPoint, Landmark, LandmarkId,
    ProgressRecord, Region, RegionId, User, UserId,
};

pub use seed::{
    COLOGNE, DEMO_USER, TRONDHEIM, example_cities, example_landmarks, example_regions,
};

#[derive(Debug, Default)]
struct State {
    cities: BTreeMap<CityId, City>,
    landmarks: BTreeMap<LandmarkId, Landmark>,
    regions: BTreeMap<RegionId, Region>,
    users: HashMap<UserId, User>,
    discoveries: HashMap<(UserId, LandmarkId), DiscoveryEvent>,
    progress: BTreeMap<(UserId, CityId), ProgressRecord>,
}

/// Shared in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the example catalogue and demo explorer.
    pub fn with_example_data() -> Self {
        let store = Self::new();
        if let Err(message) =
            store.load_catalogue(example_cities(), example_landmarks(), example_regions())
        {
            warn!(%message, "example catalogue not loaded");
        }
        match (store.lock(), seed::demo_user()) {
            (Ok(mut state), Some(demo)) => {
                state.users.insert(demo.id, demo);
            }
            (Err(message), _) => warn!(%message, "demo explorer not seeded"),
            (Ok(_), None) => warn!("demo explorer username is invalid; not seeded"),
        }
        store
    }

    /// Insert or replace catalogue entries.
    ///
    /// # Errors
    ///
    /// Returns a message when the store lock is poisoned; nothing is loaded.
    pub fn load_catalogue(
        &self,
        cities: impl IntoIterator<Item = City>,
        landmarks: impl IntoIterator<Item = Landmark>,
        regions: impl IntoIterator<Item = Region>,
    ) -> Result<(), String> {
        let mut state = self.lock()?;
        state
            .cities
            .extend(cities.into_iter().map(|city| (city.id, city)));
        state
            .landmarks
            .extend(landmarks.into_iter().map(|landmark| (landmark.id, landmark)));
        state
            .regions
            .extend(regions.into_iter().map(|region| (region.id, region)));
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

fn award(state: &mut State, id: &UserId, delta: u64) -> Option<User> {
    let user = state.users.get_mut(id)?;
    *user = user.clone().with_xp_added(delta);
    Some(user.clone())
}

fn by_name(left: &Landmark, right: &Landmark) -> std::cmp::Ordering {
    left.name.cmp(&right.name).then_with(|| left.id.cmp(&right.id))
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn get_landmark(
        &self,
        id: &LandmarkId,
    ) -> Result<Option<Landmark>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        Ok(state.landmarks.get(id).cloned())
    }

    async fn get_city(&self, id: &CityId) -> Result<Option<City>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        Ok(state.cities.get(id).cloned())
    }

    async fn count_landmarks(&self, city_id: &CityId) -> Result<u64, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        let count = state
            .landmarks
            .values()
            .filter(|landmark| landmark.city_id == *city_id)
            .count();
        Ok(count as u64)
    }

    async fn list_regions(&self, city_id: &CityId) -> Result<Vec<Region>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        Ok(state
            .regions
            .values()
            .filter(|region| region.city_id == *city_id)
            .cloned()
            .collect())
    }

    async fn list_landmarks_near(
        &self,
        origin: GeoPoint,
        radius_meters: f64,
        city_id: Option<CityId>,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
        let bbox = BoundingBox::around(origin, radius_meters);
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        Ok(state
            .landmarks
            .values()
            .filter(|landmark| city_id.is_none_or(|city| landmark.city_id == city))
            .filter(|landmark| bbox.contains(landmark.location))
            .cloned()
            .collect())
    }

    async fn list_landmarks(
        &self,
        filter: &LandmarkFilter,
    ) -> Result<Vec<Landmark>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        let mut landmarks: Vec<Landmark> = state
            .landmarks
            .values()
            .filter(|landmark| filter.city_id.is_none_or(|city| landmark.city_id == city))
            .filter(|landmark| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|category| landmark.category == *category)
            })
            .cloned()
            .collect();
        landmarks.sort_by(by_name);
        Ok(landmarks)
    }

    async fn max_discovery_radius(
        &self,
    ) -> Result<Option<DiscoveryRadius>, CatalogueRepositoryError> {
        let state = self.lock().map_err(CatalogueRepositoryError::query)?;
        Ok(state
            .landmarks
            .values()
            .map(|landmark| landmark.discovery_radius)
            .max())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        if state
            .users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(UserRepositoryError::duplicate_username(
                user.username.as_ref(),
            ));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn apply_xp(&self, id: &UserId, delta: u64) -> Result<Option<User>, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(award(&mut state, id, delta))
    }
}

#[async_trait]
impl DiscoveryRepository for InMemoryStore {
    async fn find(
        &self,
        user_id: &UserId,
        landmark_id: &LandmarkId,
    ) -> Result<Option<DiscoveryEvent>, DiscoveryRepositoryError> {
        let state = self.lock().map_err(DiscoveryRepositoryError::query)?;
        Ok(state.discoveries.get(&(*user_id, *landmark_id)).cloned())
    }

    async fn insert_and_award(
        &self,
        event: &DiscoveryEvent,
    ) -> Result<Option<User>, DiscoveryRepositoryError> {
        let mut state = self.lock().map_err(DiscoveryRepositoryError::query)?;
        let key = (event.user_id, event.landmark_id);
        if state.discoveries.contains_key(&key) {
            return Err(DiscoveryRepositoryError::conflict(format!(
                "user {} already discovered landmark {}",
                event.user_id, event.landmark_id
            )));
        }
        let Some(user) = award(&mut state, &event.user_id, event.xp_earned) else {
            return Ok(None);
        };
        state.discoveries.insert(key, event.clone());
        Ok(Some(user))
    }

    async fn count_for_city(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<u64, DiscoveryRepositoryError> {
        let state = self.lock().map_err(DiscoveryRepositoryError::query)?;
        let count = state
            .discoveries
            .values()
            .filter(|event| event.user_id == *user_id)
            .filter(|event| {
                state
                    .landmarks
                    .get(&event.landmark_id)
                    .is_some_and(|landmark| landmark.city_id == *city_id)
            })
            .count();
        Ok(count as u64)
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, DiscoveryRepositoryError> {
        let state = self.lock().map_err(DiscoveryRepositoryError::query)?;
        let count = state
            .discoveries
            .values()
            .filter(|event| event.user_id == *user_id)
            .count();
        Ok(count as u64)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        city_id: Option<CityId>,
    ) -> Result<Vec<DiscoveryEvent>, DiscoveryRepositoryError> {
        let state = self.lock().map_err(DiscoveryRepositoryError::query)?;
        let mut events: Vec<DiscoveryEvent> = state
            .discoveries
            .values()
            .filter(|event| event.user_id == *user_id)
            .filter(|event| {
                city_id.is_none_or(|city| {
                    state
                        .landmarks
                        .get(&event.landmark_id)
                        .is_some_and(|landmark| landmark.city_id == city)
                })
            })
            .cloned()
            .collect();
        events.sort_by(|left, right| {
            right
                .discovered_at
                .cmp(&left.discovered_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(events)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn find(
        &self,
        user_id: &UserId,
        city_id: &CityId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError> {
        let state = self.lock().map_err(ProgressRepositoryError::query)?;
        Ok(state.progress.get(&(*user_id, *city_id)).cloned())
    }

    async fn create_if_absent(
        &self,
        record: &ProgressRecord,
    ) -> Result<ProgressRecord, ProgressRepositoryError> {
        let mut state = self.lock().map_err(ProgressRepositoryError::query)?;
        Ok(state
            .progress
            .entry((record.user_id, record.city_id))
            .or_insert_with(|| record.clone())
            .clone())
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), ProgressRepositoryError> {
        let mut state = self.lock().map_err(ProgressRepositoryError::query)?;
        state
            .progress
            .insert((record.user_id, record.city_id), record.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProgressRecord>, ProgressRepositoryError> {
        let state = self.lock().map_err(ProgressRepositoryError::query)?;
        Ok(state
            .progress
            .range((*user_id, CityId::from_uuid(uuid::Uuid::nil()))..)
            .take_while(|((owner, _), _)| owner == user_id)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
