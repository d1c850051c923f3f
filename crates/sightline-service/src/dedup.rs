//! Origin-based view deduplication.

use sightline_core::ViewEvent;
use std::time::Duration;

/// Default dedup window (1 hour).
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(60 * 60);

/// A view about to be counted.
#[derive(Debug, Clone, Copy)]
pub struct ViewCandidate<'a> {
    /// Network origin of the viewer, if known.
    pub origin: Option<&'a str>,
    /// Current time in epoch milliseconds.
    pub now_ms: i64,
}

/// Outcome of a dedup decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDecision {
    /// Whether a new event should be appended to the ledger.
    pub should_record: bool,
    /// View count to report, including the new event if one is recorded.
    pub count: u64,
}

/// Decides whether a view is new or a repeat from the same origin.
///
/// A view without an origin is never recorded. A view from an origin whose
/// latest prior event is more than `window` old (strictly) is recorded; so is
/// the first view from an origin.
#[derive(Debug, Clone, Copy)]
pub struct DedupPolicy {
    window_ms: i64,
}

impl DedupPolicy {
    /// Creates a policy with the given window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Returns the window in milliseconds.
    #[must_use]
    pub const fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Applies the policy to the full prior history of a profile.
    #[must_use]
    pub fn decide(&self, prior: &[ViewEvent], candidate: ViewCandidate<'_>) -> ViewDecision {
        let existing = prior.len() as u64;

        let Some(origin) = candidate.origin else {
            return ViewDecision {
                should_record: false,
                count: existing,
            };
        };

        let last_seen = prior
            .iter()
            .filter(|event| event.is_from_origin(origin))
            .map(|event| event.timestamp_ms)
            .max();

        let outside_window = match last_seen {
            None => true,
            Some(last) => candidate.now_ms.saturating_sub(last) > self.window_ms,
        };

        if outside_window {
            ViewDecision {
                should_record: true,
                count: existing + 1,
            }
        } else {
            ViewDecision {
                should_record: false,
                count: existing,
            }
        }
    }
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW)
    }
}
