//! Profile lookup service trait definition.

use crate::dto::ProfileResponse;
use async_trait::async_trait;
use sightline_core::{ProfileId, SightlineResult};

/// Options for a single profile lookup.
#[derive(Debug, Clone, Default)]
pub struct FindProfileOptions {
    /// Record a view and report the resulting count.
    pub increment_view: bool,
    /// Identity of the viewer, if authenticated.
    pub viewer: Option<ProfileId>,
    /// Network origin of the viewer, used as the dedup key.
    pub viewer_origin: Option<String>,
    /// Skip the cache read. The cache is still filled afterwards.
    pub bypass_cache: bool,
}

impl FindProfileOptions {
    /// Options for a lookup that records a view from `origin`.
    #[must_use]
    pub fn counting_view(viewer: Option<ProfileId>, origin: Option<String>) -> Self {
        Self {
            increment_view: true,
            viewer,
            viewer_origin: origin,
            bypass_cache: false,
        }
    }

    /// Sets the cache bypass flag.
    #[must_use]
    pub const fn bypassing_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }
}

/// Profile lookup service trait.
#[async_trait]
pub trait ProfileLookupService: Send + Sync {
    /// Finds a profile, optionally recording a view.
    ///
    /// A lookup that does not record a view may be served from the cache and
    /// reports `views_count = 0`. A lookup that records a view always reads
    /// the store and the ledger.
    ///
    /// # Errors
    ///
    /// `NotFound` if no profile exists for `identity`; `StorageUnavailable`
    /// if the store or ledger fails.
    async fn find(
        &self,
        identity: &ProfileId,
        options: FindProfileOptions,
    ) -> SightlineResult<ProfileResponse>;
}
