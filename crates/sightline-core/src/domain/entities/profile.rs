//! Profile entity.

use crate::ProfileId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-like profile served by identity.
///
/// The view count is not part of the entity: it is computed on read and
/// attached to the response, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identity; immutable after creation.
    pub identity: ProfileId,

    /// Display name.
    pub name: Option<String>,

    /// Free-form biography.
    pub bio: Option<String>,

    /// Profile picture URL.
    pub avatar_url: Option<String>,

    /// External links shown on the profile.
    pub links: Vec<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Creates an empty profile for the given identity.
    #[must_use]
    pub fn new(identity: ProfileId) -> Self {
        let now = Utc::now();
        Self {
            identity,
            name: None,
            bio: None,
            avatar_url: None,
            links: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the biography.
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Applies a partial update. The identity is never touched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        if let Some(links) = update.links {
            self.links = links;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial set of display attributes for a profile update.
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub links: Option<Vec<String>>,
}
