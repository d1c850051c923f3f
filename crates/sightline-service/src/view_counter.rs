//! View accounting against the event ledger.

use crate::dedup::{DedupPolicy, ViewCandidate};
use crate::metrics::names;
use metrics::counter;
use sightline_config::ViewsConfig;
use sightline_core::{Clock, ProfileId, SightlineResult, SystemClock, ViewEvent};
use sightline_repository::ViewEventRepository;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Fixed pool of async mutexes indexed by a hash of the viewed identity.
#[derive(Debug)]
struct StripedLocks {
    stripes: Vec<Mutex<()>>,
}

impl StripedLocks {
    fn new(count: usize) -> Self {
        let stripes = (0..count.max(1)).map(|_| Mutex::new(())).collect();
        Self { stripes }
    }

    async fn lock(&self, key: &ProfileId) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let index = (hasher.finish() % self.stripes.len() as u64) as usize;
        self.stripes[index].lock().await
    }
}

/// Counts profile views, appending a ledger event when the view is new.
///
/// The ledger read, the dedup decision and the append are not atomic at the
/// storage layer. With serialization enabled, calls for the same viewed
/// profile queue behind a striped lock, so within one process a repeat view
/// from the same origin is recorded at most once per window. Separate
/// processes sharing a ledger can still double count.
pub struct ViewCounter {
    ledger: Arc<dyn ViewEventRepository>,
    policy: DedupPolicy,
    clock: Arc<dyn Clock>,
    locks: Option<StripedLocks>,
}

impl std::fmt::Debug for ViewCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCounter")
            .field("policy", &self.policy)
            .field("clock", &self.clock)
            .field("stripes", &self.locks.as_ref().map(|l| l.stripes.len()))
            .finish_non_exhaustive()
    }
}

impl ViewCounter {
    /// Creates an unserialized counter using the system clock.
    #[must_use]
    pub fn new(ledger: Arc<dyn ViewEventRepository>, policy: DedupPolicy) -> Self {
        Self {
            ledger,
            policy,
            clock: Arc::new(SystemClock),
            locks: None,
        }
    }

    /// Creates a counter from configuration.
    #[must_use]
    pub fn from_config(ledger: Arc<dyn ViewEventRepository>, config: &ViewsConfig) -> Self {
        let counter = Self::new(ledger, DedupPolicy::new(config.dedup_window()));
        if config.serialize_per_profile {
            counter.with_serialization(config.lock_stripes)
        } else {
            counter
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Serializes recording per viewed profile over `stripes` locks.
    #[must_use]
    pub fn with_serialization(mut self, stripes: usize) -> Self {
        self.locks = Some(StripedLocks::new(stripes));
        self
    }

    /// Returns true if recording is serialized per viewed profile.
    #[must_use]
    pub const fn is_serialized(&self) -> bool {
        self.locks.is_some()
    }

    /// Records a view of `viewed` and returns the resulting view count.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the ledger cannot be read or appended to.
    pub async fn record_view(
        &self,
        viewed: &ProfileId,
        viewer: Option<&ProfileId>,
        origin: Option<&str>,
    ) -> SightlineResult<u64> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.lock(viewed).await),
            None => None,
        };

        let prior = self.ledger.find_events(viewed).await.map_err(|e| {
            warn!(profile = %viewed, error = ?e, "Failed to read view history");
            e.into_storage_unavailable("find view events")
        })?;

        let now_ms = self.clock.now_millis();
        let decision = self.policy.decide(&prior, ViewCandidate { origin, now_ms });

        if decision.should_record {
            let event = ViewEvent::new(
                viewed.clone(),
                viewer.cloned(),
                origin.map(str::to_string),
                now_ms,
            );
            self.ledger.append(&event).await.map_err(|e| {
                warn!(profile = %viewed, error = ?e, "Failed to append view event");
                e.into_storage_unavailable("append view event")
            })?;
            counter!(names::VIEWS_RECORDED_TOTAL).increment(1);
            debug!("Recorded view of {} (count {})", viewed, decision.count);
        } else {
            counter!(names::VIEWS_DEDUPLICATED_TOTAL).increment(1);
            debug!("View of {} not recorded (count {})", viewed, decision.count);
        }

        Ok(decision.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::future::join_all;
    use sightline_core::{ManualClock, SightlineError};
    use sightline_repository::InMemoryViewEventRepository;
    use std::time::Duration;

    const START: i64 = 1_700_000_000_000;

    fn counter_with(ledger: Arc<dyn ViewEventRepository>, clock: Arc<ManualClock>) -> ViewCounter {
        ViewCounter::new(ledger, DedupPolicy::default()).with_clock(clock)
    }

    /// Ledger that snapshots history, then yields to the timer before returning.
    #[derive(Debug, Default)]
    struct SlowLedger {
        inner: InMemoryViewEventRepository,
    }

    #[async_trait]
    impl ViewEventRepository for SlowLedger {
        async fn find_events(&self, viewed: &ProfileId) -> SightlineResult<Vec<ViewEvent>> {
            let events = self.inner.find_events(viewed).await?;
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(events)
        }

        async fn append(&self, event: &ViewEvent) -> SightlineResult<()> {
            self.inner.append(event).await
        }
    }

    /// Ledger whose reads always fail.
    #[derive(Debug)]
    struct BrokenLedger;

    #[async_trait]
    impl ViewEventRepository for BrokenLedger {
        async fn find_events(&self, _viewed: &ProfileId) -> SightlineResult<Vec<ViewEvent>> {
            Err(SightlineError::internal("corrupt row"))
        }

        async fn append(&self, _event: &ViewEvent) -> SightlineResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_first_view_is_appended() {
        let ledger = Arc::new(InMemoryViewEventRepository::new());
        let clock = Arc::new(ManualClock::new(START));
        let counter = counter_with(ledger.clone(), clock);
        let alice = ProfileId::new_unchecked("alice");
        let bob = ProfileId::new_unchecked("bob");

        let count = counter
            .record_view(&alice, Some(&bob), Some("10.0.0.1"))
            .await
            .unwrap();
        assert_eq!(count, 1);

        let events = ledger.find_events(&alice).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ms, START);
        assert_eq!(events[0].viewer.as_ref(), Some(&bob));
    }

    #[tokio::test]
    async fn test_repeat_view_within_window() {
        let ledger = Arc::new(InMemoryViewEventRepository::new());
        let clock = Arc::new(ManualClock::new(START));
        let counter = counter_with(ledger.clone(), clock.clone());
        let alice = ProfileId::new_unchecked("alice");

        counter.record_view(&alice, None, Some("o1")).await.unwrap();
        clock.advance(60_000);
        let count = counter.record_view(&alice, None, Some("o1")).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(ledger.total_events(), 1);

        clock.advance(3_600_000);
        let count = counter.record_view(&alice, None, Some("o1")).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(ledger.total_events(), 2);
    }

    #[tokio::test]
    async fn test_view_without_origin_is_counted_passively() {
        let ledger = Arc::new(InMemoryViewEventRepository::new());
        let counter = counter_with(ledger.clone(), Arc::new(ManualClock::new(START)));
        let alice = ProfileId::new_unchecked("alice");

        counter.record_view(&alice, None, Some("o1")).await.unwrap();
        let count = counter.record_view(&alice, None, None).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(ledger.total_events(), 1);
    }

    #[tokio::test]
    async fn test_ledger_failure_is_storage_unavailable() {
        let counter = counter_with(Arc::new(BrokenLedger), Arc::new(ManualClock::new(START)));
        let err = counter
            .record_view(&ProfileId::new_unchecked("alice"), None, Some("o1"))
            .await
            .unwrap_err();
        assert!(err.is_storage_unavailable());
        assert_eq!(err.status_code(), 503);
    }

    #[tokio::test(start_paused = true)]
    async fn test_serialized_concurrent_views_count_once() {
        let ledger = Arc::new(SlowLedger::default());
        let counter = counter_with(ledger.clone(), Arc::new(ManualClock::new(START)))
            .with_serialization(8);
        let alice = ProfileId::new_unchecked("alice");

        let results = join_all((0..8).map(|_| counter.record_view(&alice, None, Some("o1")))).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(ledger.inner.total_events(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unserialized_concurrent_views_may_double_count() {
        let ledger = Arc::new(SlowLedger::default());
        let counter = counter_with(ledger.clone(), Arc::new(ManualClock::new(START)));
        let alice = ProfileId::new_unchecked("alice");

        join_all((0..4).map(|_| counter.record_view(&alice, None, Some("o1")))).await;

        // Every call read the empty history before any append landed.
        assert_eq!(ledger.inner.total_events(), 4);
    }

    #[test]
    fn test_from_config() {
        let ledger: Arc<dyn ViewEventRepository> = Arc::new(InMemoryViewEventRepository::new());
        let config = ViewsConfig {
            dedup_window_secs: 60,
            serialize_per_profile: false,
            lock_stripes: 16,
        };
        let counter = ViewCounter::from_config(ledger, &config);
        assert!(!counter.is_serialized());
        assert_eq!(counter.policy.window_ms(), 60_000);
    }
}
