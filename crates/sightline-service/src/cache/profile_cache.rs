//! In-process TTL cache for profile snapshots.

use crate::metrics::names;
use metrics::counter;
use parking_lot::RwLock;
use sightline_config::CacheConfig;
use sightline_core::{Profile, ProfileId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default TTL for cached profiles (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    profile: Profile,
    inserted_at: Instant,
}

/// Read-through cache keyed by profile identity.
///
/// `get` and `set` never suspend. Expired entries read as misses and are
/// dropped on the next `get` for the same key or by [`purge_expired`].
/// There is no invalidation on write: staleness is bounded only by the TTL.
///
/// [`purge_expired`]: ProfileCache::purge_expired
#[derive(Debug)]
pub struct ProfileCache {
    entries: RwLock<HashMap<ProfileId, CacheEntry>>,
    ttl: Duration,
    enabled: bool,
}

impl ProfileCache {
    /// Creates a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            enabled: true,
        }
    }

    /// Creates a cache that never holds anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(DEFAULT_TTL)
        }
    }

    /// Creates a cache from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.ttl())
        } else {
            Self::disabled()
        }
    }

    /// Returns the configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns true unless the cache was built disabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the live profile for `identity`, if any.
    pub fn get(&self, identity: &ProfileId) -> Option<Profile> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(identity) {
                Some(entry) if self.is_live(entry, now) => {
                    counter!(names::CACHE_HITS_TOTAL).increment(1);
                    return Some(entry.profile.clone());
                }
                Some(_) => {}
                None => {
                    counter!(names::CACHE_MISSES_TOTAL).increment(1);
                    return None;
                }
            }
        }

        // Expired: evict unless a fresh entry raced in between the locks.
        let mut entries = self.entries.write();
        if entries
            .get(identity)
            .is_some_and(|entry| !self.is_live(entry, now))
        {
            debug!("Evicting expired cache entry: {}", identity);
            entries.remove(identity);
        }
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
        None
    }

    /// Stores `profile` unless a live entry already exists for `identity`.
    ///
    /// Returns true if the profile was stored.
    pub fn set(&self, identity: &ProfileId, profile: &Profile) -> bool {
        if !self.enabled {
            return false;
        }

        let now = Instant::now();
        let mut entries = self.entries.write();
        if entries
            .get(identity)
            .is_some_and(|entry| self.is_live(entry, now))
        {
            return false;
        }

        entries.insert(
            identity.clone(),
            CacheEntry {
                profile: profile.clone(),
                inserted_at: now,
            },
        );
        debug!("Cached profile: {}", identity);
        true
    }

    /// Returns true if a live entry exists for `identity`.
    pub fn has(&self, identity: &ProfileId) -> bool {
        if !self.enabled {
            return false;
        }
        let now = Instant::now();
        self.entries
            .read()
            .get(identity)
            .is_some_and(|entry| self.is_live(entry, now))
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn is_live(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) < self.ttl
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(identity: &str, name: &str) -> Profile {
        Profile::new(ProfileId::new_unchecked(identity)).with_name(name)
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_if_absent_keeps_first_value() {
        let cache = ProfileCache::new(Duration::from_secs(300));
        let id = ProfileId::new_unchecked("alice");

        assert!(cache.set(&id, &profile("alice", "first")));
        assert!(!cache.set(&id, &profile("alice", "second")));

        let cached = cache.get(&id).unwrap();
        assert_eq!(cached.name.as_deref(), Some("first"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ProfileCache::new(Duration::from_secs(300));
        let id = ProfileId::new_unchecked("alice");
        cache.set(&id, &profile("alice", "Alice"));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.has(&id));
        assert!(cache.get(&id).is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!cache.has(&id));
        assert!(cache.get(&id).is_none());
        // lazily evicted by the miss above
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_replaces_expired_entry() {
        let cache = ProfileCache::new(Duration::from_secs(10));
        let id = ProfileId::new_unchecked("alice");
        cache.set(&id, &profile("alice", "old"));

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(cache.set(&id, &profile("alice", "new")));
        assert_eq!(cache.get(&id).unwrap().name.as_deref(), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = ProfileCache::new(Duration::from_secs(10));
        cache.set(&ProfileId::new_unchecked("a"), &profile("a", "A"));
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set(&ProfileId::new_unchecked("b"), &profile("b", "B"));
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.has(&ProfileId::new_unchecked("b")));
    }

    #[test]
    fn test_disabled_cache_never_stores() {
        let cache = ProfileCache::disabled();
        let id = ProfileId::new_unchecked("alice");

        assert!(!cache.set(&id, &profile("alice", "Alice")));
        assert!(cache.get(&id).is_none());
        assert!(!cache.has(&id));
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_from_config() {
        let config = CacheConfig {
            enabled: true,
            ttl_secs: 42,
        };
        let cache = ProfileCache::from_config(&config);
        assert_eq!(cache.ttl(), Duration::from_secs(42));
        assert!(cache.is_enabled());
    }
}
