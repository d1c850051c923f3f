//! MySQL profile repository implementation.

use crate::{traits::ProfileRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sightline_core::{Profile, ProfileId, ProfileUpdate, SightlineError, SightlineResult};
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL profile repository implementation.
#[derive(Clone)]
pub struct MySqlProfileRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlProfileRepository {
    /// Creates a new MySQL profile repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a profile.
#[derive(Debug, FromRow)]
struct ProfileRow {
    identity: String,
    name: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    links: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            identity: ProfileId::new_unchecked(row.identity),
            name: row.name,
            bio: row.bio,
            avatar_url: row.avatar_url,
            links: row.links.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProfileRepository for MySqlProfileRepository {
    async fn find_by_identity(&self, identity: &ProfileId) -> SightlineResult<Option<Profile>> {
        debug!("Finding profile by identity: {}", identity);

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT identity, name, bio, avatar_url, links, created_at, updated_at
            FROM profiles
            WHERE identity = ?
            "#,
        )
        .bind(identity.as_str())
        .fetch_optional(self.pool.inner())
        .await
        .map_err(|e| SightlineError::storage("find profile", e))?;

        Ok(row.map(Profile::from))
    }

    async fn save(&self, profile: &Profile) -> SightlineResult<Profile> {
        debug!("Saving profile: {}", profile.identity);

        sqlx::query(
            r#"
            INSERT INTO profiles (identity, name, bio, avatar_url, links, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                bio = VALUES(bio),
                avatar_url = VALUES(avatar_url),
                links = VALUES(links),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(profile.identity.as_str())
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(Json(&profile.links))
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(self.pool.inner())
        .await
        .map_err(|e| SightlineError::storage("save profile", e))?;

        Ok(profile.clone())
    }

    async fn update(&self, identity: &ProfileId, update: ProfileUpdate) -> SightlineResult<Profile> {
        debug!("Updating profile: {}", identity);

        let mut profile = self
            .find_by_identity(identity)
            .await?
            .ok_or_else(|| SightlineError::not_found("Profile", identity))?;

        profile.apply(update);

        sqlx::query(
            r#"
            UPDATE profiles
            SET name = ?, bio = ?, avatar_url = ?, links = ?, updated_at = ?
            WHERE identity = ?
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(Json(&profile.links))
        .bind(profile.updated_at)
        .bind(identity.as_str())
        .execute(self.pool.inner())
        .await
        .map_err(|e| SightlineError::storage("update profile", e))?;

        Ok(profile)
    }
}
