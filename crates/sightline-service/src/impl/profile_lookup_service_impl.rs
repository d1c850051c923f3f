//! Profile lookup service implementation.

use crate::cache::ProfileCache;
use crate::dto::ProfileResponse;
use crate::metrics::names;
use crate::profile_service::{FindProfileOptions, ProfileLookupService};
use crate::view_counter::ViewCounter;
use async_trait::async_trait;
use metrics::histogram;
use sightline_core::{ProfileId, SightlineError, SightlineResult};
use sightline_repository::ProfileRepository;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Read-through profile lookup with optional view accounting.
pub struct ProfileLookupServiceImpl {
    profiles: Arc<dyn ProfileRepository>,
    cache: Arc<ProfileCache>,
    views: Arc<ViewCounter>,
}

impl ProfileLookupServiceImpl {
    /// Creates a new lookup service.
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        cache: Arc<ProfileCache>,
        views: Arc<ViewCounter>,
    ) -> Self {
        Self {
            profiles,
            cache,
            views,
        }
    }

    /// Returns the shared profile cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ProfileCache> {
        &self.cache
    }

    async fn lookup(
        &self,
        identity: &ProfileId,
        options: FindProfileOptions,
    ) -> SightlineResult<ProfileResponse> {
        if !options.bypass_cache && !options.increment_view {
            if let Some(profile) = self.cache.get(identity) {
                debug!("Profile cache hit: {}", identity);
                return Ok(ProfileResponse::from_profile(profile, 0));
            }
        }

        let profile = self
            .profiles
            .find_by_identity(identity)
            .await
            .map_err(|e| {
                error!(profile = %identity, error = ?e, "Failed to read profile");
                e.into_storage_unavailable("find profile")
            })?
            .ok_or_else(|| SightlineError::not_found("Profile", identity))?;

        let views_count = if options.increment_view {
            self.views
                .record_view(
                    identity,
                    options.viewer.as_ref(),
                    options.viewer_origin.as_deref(),
                )
                .await?
        } else {
            0
        };

        self.cache.set(identity, &profile);

        Ok(ProfileResponse::from_profile(profile, views_count))
    }
}

#[async_trait]
impl ProfileLookupService for ProfileLookupServiceImpl {
    async fn find(
        &self,
        identity: &ProfileId,
        options: FindProfileOptions,
    ) -> SightlineResult<ProfileResponse> {
        debug!(
            "Finding profile: {} (increment_view={}, bypass_cache={})",
            identity, options.increment_view, options.bypass_cache
        );

        let started = Instant::now();
        let result = self.lookup(identity, options).await;
        histogram!(names::LOOKUP_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        result
    }
}
