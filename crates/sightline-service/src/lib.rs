//! # Sightline Service
//!
//! Read path for profiles: a TTL cache in front of the profile store,
//! origin-based view deduplication, and the lookup service that composes
//! them.

pub mod cache;
pub mod dedup;
pub mod dto;
pub mod r#impl;
pub mod metrics;
pub mod profile_service;
pub mod view_counter;

pub use cache::*;
pub use dedup::*;
pub use dto::*;
pub use r#impl::ProfileLookupServiceImpl;
pub use profile_service::*;
pub use view_counter::*;
