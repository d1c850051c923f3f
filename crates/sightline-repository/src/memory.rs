//! Process-local repositories.
//!
//! Used by the `memory` storage backend and by tests across the workspace.
//! Nothing here survives a restart.

use crate::traits::{ProfileRepository, ViewEventRepository};
use async_trait::async_trait;
use parking_lot::RwLock;
use sightline_core::{
    HealthCheck, HealthStatus, Profile, ProfileId, ProfileUpdate, SightlineError, SightlineResult,
    ViewEvent,
};
use std::collections::HashMap;

/// In-memory profile store.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `profiles`.
    #[must_use]
    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let map = profiles
            .into_iter()
            .map(|profile| (profile.identity.clone(), profile))
            .collect();
        Self {
            profiles: RwLock::new(map),
        }
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Returns true if no profile is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_identity(&self, identity: &ProfileId) -> SightlineResult<Option<Profile>> {
        Ok(self.profiles.read().get(identity).cloned())
    }

    async fn save(&self, profile: &Profile) -> SightlineResult<Profile> {
        self.profiles
            .write()
            .insert(profile.identity.clone(), profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, identity: &ProfileId, update: ProfileUpdate) -> SightlineResult<Profile> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(identity)
            .ok_or_else(|| SightlineError::not_found("Profile", identity))?;
        profile.apply(update);
        Ok(profile.clone())
    }
}

#[async_trait]
impl HealthCheck for InMemoryProfileRepository {
    fn name(&self) -> &str {
        "memory"
    }

    async fn check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

/// In-memory append-only view ledger.
#[derive(Debug, Default)]
pub struct InMemoryViewEventRepository {
    events: RwLock<HashMap<ProfileId, Vec<ViewEvent>>>,
}

impl InMemoryViewEventRepository {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger pre-populated with `events`.
    #[must_use]
    pub fn with_events(events: impl IntoIterator<Item = ViewEvent>) -> Self {
        let mut map: HashMap<ProfileId, Vec<ViewEvent>> = HashMap::new();
        for event in events {
            map.entry(event.viewed.clone()).or_default().push(event);
        }
        for history in map.values_mut() {
            history.sort_by_key(|e| e.timestamp_ms);
        }
        Self {
            events: RwLock::new(map),
        }
    }

    /// Total number of events across all profiles.
    #[must_use]
    pub fn total_events(&self) -> usize {
        self.events.read().values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ViewEventRepository for InMemoryViewEventRepository {
    async fn find_events(&self, viewed: &ProfileId) -> SightlineResult<Vec<ViewEvent>> {
        Ok(self.events.read().get(viewed).cloned().unwrap_or_default())
    }

    async fn append(&self, event: &ViewEvent) -> SightlineResult<()> {
        self.events
            .write()
            .entry(event.viewed.clone())
            .or_default()
            .push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(identity: &str) -> Profile {
        Profile::new(ProfileId::new_unchecked(identity)).with_name(identity.to_uppercase())
    }

    fn event(viewed: &str, origin: Option<&str>, timestamp_ms: i64) -> ViewEvent {
        ViewEvent::new(
            ProfileId::new_unchecked(viewed),
            None,
            origin.map(str::to_string),
            timestamp_ms,
        )
    }

    // =============================================================================
    // ProfileRepository Tests
    // =============================================================================

    #[tokio::test]
    async fn test_save_and_find_by_identity() {
        let repo = InMemoryProfileRepository::new();
        repo.save(&profile("alice")).await.unwrap();

        let found = repo
            .find_by_identity(&ProfileId::new_unchecked("alice"))
            .await
            .unwrap();
        assert_eq!(found.unwrap().name.as_deref(), Some("ALICE"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_identity_not_found() {
        let repo = InMemoryProfileRepository::new();
        let found = repo
            .find_by_identity(&ProfileId::new_unchecked("nobody"))
            .await
            .unwrap();
        assert!(found.is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let repo = InMemoryProfileRepository::with_profiles(vec![profile("alice")]);
        let id = ProfileId::new_unchecked("alice");

        let updated = repo
            .update(
                &id,
                ProfileUpdate {
                    bio: Some("builder".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("builder"));

        let stored = repo.find_by_identity(&id).await.unwrap().unwrap();
        assert_eq!(stored.bio.as_deref(), Some("builder"));
        assert_eq!(stored.name.as_deref(), Some("ALICE"));
    }

    #[tokio::test]
    async fn test_update_missing_profile() {
        let repo = InMemoryProfileRepository::new();
        let err = repo
            .update(&ProfileId::new_unchecked("nobody"), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_memory_health_check() {
        let repo = InMemoryProfileRepository::new();
        assert_eq!(repo.name(), "memory");
        assert!(repo.check().await.is_healthy());
    }

    // =============================================================================
    // ViewEventRepository Tests
    // =============================================================================

    #[tokio::test]
    async fn test_find_events_empty() {
        let repo = InMemoryViewEventRepository::new();
        let events = repo
            .find_events(&ProfileId::new_unchecked("alice"))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_append_and_find_events_per_profile() {
        let repo = InMemoryViewEventRepository::new();
        repo.append(&event("alice", Some("1.1.1.1"), 10)).await.unwrap();
        repo.append(&event("alice", None, 20)).await.unwrap();
        repo.append(&event("bob", Some("1.1.1.1"), 30)).await.unwrap();

        let alice = repo
            .find_events(&ProfileId::new_unchecked("alice"))
            .await
            .unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].timestamp_ms, 10);
        assert_eq!(repo.total_events(), 3);
    }

    #[tokio::test]
    async fn test_with_events_sorts_history() {
        let repo = InMemoryViewEventRepository::with_events(vec![
            event("alice", Some("a"), 300),
            event("alice", Some("b"), 100),
            event("alice", Some("c"), 200),
        ]);

        let history = repo
            .find_events(&ProfileId::new_unchecked("alice"))
            .await
            .unwrap();
        let timestamps: Vec<i64> = history.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(timestamps, vec![100, 200, 300]);
    }
}
