//! MySQL view event ledger implementation.

use crate::{traits::ViewEventRepository, DatabasePool};
use async_trait::async_trait;
use sightline_core::{ProfileId, SightlineError, SightlineResult, ViewEvent, ViewEventId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// MySQL view event repository implementation.
#[derive(Clone)]
pub struct MySqlViewEventRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlViewEventRepository {
    /// Creates a new MySQL view event repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a view event.
#[derive(Debug, FromRow)]
struct ViewEventRow {
    id: String, // MySQL stores UUID as CHAR(36)
    viewed: String,
    viewer: Option<String>,
    viewer_origin: Option<String>,
    viewed_at_ms: i64,
}

impl TryFrom<ViewEventRow> for ViewEvent {
    type Error = SightlineError;

    fn try_from(row: ViewEventRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| SightlineError::Internal(format!("Invalid UUID in database: {}", e)))?;

        Ok(ViewEvent {
            id: ViewEventId::from_uuid(id),
            viewed: ProfileId::new_unchecked(row.viewed),
            viewer: row.viewer.map(ProfileId::new_unchecked),
            viewer_origin: row.viewer_origin,
            timestamp_ms: row.viewed_at_ms,
        })
    }
}

#[async_trait]
impl ViewEventRepository for MySqlViewEventRepository {
    async fn find_events(&self, viewed: &ProfileId) -> SightlineResult<Vec<ViewEvent>> {
        debug!("Loading view events for: {}", viewed);

        let rows = sqlx::query_as::<_, ViewEventRow>(
            r#"
            SELECT id, viewed, viewer, viewer_origin, viewed_at_ms
            FROM profile_views
            WHERE viewed = ?
            ORDER BY viewed_at_ms ASC
            "#,
        )
        .bind(viewed.as_str())
        .fetch_all(self.pool.inner())
        .await
        .map_err(|e| SightlineError::storage("find view events", e))?;

        rows.into_iter().map(ViewEvent::try_from).collect()
    }

    async fn append(&self, event: &ViewEvent) -> SightlineResult<()> {
        debug!("Appending view event {} for: {}", event.id, event.viewed);

        sqlx::query(
            r#"
            INSERT INTO profile_views (id, viewed, viewer, viewer_origin, viewed_at_ms)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.into_inner().to_string())
        .bind(event.viewed.as_str())
        .bind(event.viewer.as_ref().map(ProfileId::as_str))
        .bind(&event.viewer_origin)
        .bind(event.timestamp_ms)
        .execute(self.pool.inner())
        .await
        .map_err(|e| SightlineError::storage("append view event", e))?;

        Ok(())
    }
}
