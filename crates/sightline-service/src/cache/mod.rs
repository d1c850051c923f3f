//! Caching infrastructure for the service layer.
//!
//! Profiles are cached in process with a fixed time-to-live. Entries are
//! filled once and never overwritten while live, so a slow concurrent read
//! cannot clobber the value a faster one already stored.

mod profile_cache;

pub use profile_cache::{ProfileCache, DEFAULT_TTL};
