//! Prometheus metrics for the profile read path.

use metrics::{describe_counter, describe_histogram};

/// Metric names for profile lookups.
pub mod names {
    /// Profile cache hits.
    pub const CACHE_HITS_TOTAL: &str = "sightline_profile_cache_hits_total";
    /// Profile cache misses, including expired entries.
    pub const CACHE_MISSES_TOTAL: &str = "sightline_profile_cache_misses_total";
    /// View events appended to the ledger.
    pub const VIEWS_RECORDED_TOTAL: &str = "sightline_profile_views_recorded_total";
    /// Views suppressed by deduplication or missing origin.
    pub const VIEWS_DEDUPLICATED_TOTAL: &str = "sightline_profile_views_deduplicated_total";
    /// End-to-end lookup duration in seconds.
    pub const LOOKUP_DURATION_SECONDS: &str = "sightline_profile_lookup_duration_seconds";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of profile lookups served from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of profile cache misses"
    );
    describe_counter!(
        names::VIEWS_RECORDED_TOTAL,
        "Total number of profile views appended to the ledger"
    );
    describe_counter!(
        names::VIEWS_DEDUPLICATED_TOTAL,
        "Total number of profile views that were not recorded"
    );
    describe_histogram!(
        names::LOOKUP_DURATION_SECONDS,
        "Profile lookup duration in seconds"
    );
}
