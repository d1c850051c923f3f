//! Repository trait definitions.

use async_trait::async_trait;
use sightline_core::{Profile, ProfileId, ProfileUpdate, SightlineResult, ViewEvent};

/// Durable store of profiles keyed by identity.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by identity.
    async fn find_by_identity(&self, identity: &ProfileId) -> SightlineResult<Option<Profile>>;

    /// Saves a new profile, replacing any profile with the same identity.
    async fn save(&self, profile: &Profile) -> SightlineResult<Profile>;

    /// Applies a partial update to an existing profile.
    ///
    /// Fails with `NotFound` when no profile has this identity.
    async fn update(&self, identity: &ProfileId, update: ProfileUpdate) -> SightlineResult<Profile>;
}

/// Append-only ledger of profile views.
#[async_trait]
pub trait ViewEventRepository: Send + Sync {
    /// Returns every view event recorded for `viewed`, oldest first.
    ///
    /// There is no pagination: the full history is returned.
    async fn find_events(&self, viewed: &ProfileId) -> SightlineResult<Vec<ViewEvent>>;

    /// Appends a view event.
    async fn append(&self, event: &ViewEvent) -> SightlineResult<()>;
}
