//! Profile-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sightline_core::{Profile, ProfileId};
use utoipa::ToSchema;

/// Profile response DTO.
///
/// `views_count` is computed per request and is 0 unless the lookup
/// recorded a view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(value_type = String, example = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f")]
    pub identity: ProfileId,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub links: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views_count: u64,
}

impl ProfileResponse {
    /// Builds a response from a profile snapshot and a view count.
    #[must_use]
    pub fn from_profile(profile: Profile, views_count: u64) -> Self {
        Self {
            identity: profile.identity,
            name: profile.name,
            bio: profile.bio,
            avatar_url: profile.avatar_url,
            links: profile.links,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            views_count,
        }
    }
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self::from_profile(profile, 0)
    }
}
