//! View event entity.

use crate::{ProfileId, ViewEventId};
use serde::{Deserialize, Serialize};

/// One recorded view of a profile.
///
/// View events are append-only: once written to the ledger they are never
/// updated. Both the viewer identity and the viewer origin may be absent,
/// which is how anonymous views are represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEvent {
    /// Unique identifier of the event.
    pub id: ViewEventId,

    /// The profile that was viewed.
    pub viewed: ProfileId,

    /// The identity of the visitor, if known.
    pub viewer: Option<ProfileId>,

    /// Coarse network origin of the visitor; the deduplication key.
    pub viewer_origin: Option<String>,

    /// Wall-clock time of the view in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl ViewEvent {
    /// Creates a new view event with a fresh ID.
    #[must_use]
    pub fn new(
        viewed: ProfileId,
        viewer: Option<ProfileId>,
        viewer_origin: Option<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            id: ViewEventId::new(),
            viewed,
            viewer,
            viewer_origin,
            timestamp_ms,
        }
    }

    /// Returns true if the event was recorded from the given origin.
    #[must_use]
    pub fn is_from_origin(&self, origin: &str) -> bool {
        self.viewer_origin.as_deref() == Some(origin)
    }
}
