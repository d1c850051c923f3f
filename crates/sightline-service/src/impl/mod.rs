//! Profile service implementations.
//!
//! Trait definitions live in the parent module (`profile_service.rs`).

pub mod profile_lookup_service_impl;

pub use profile_lookup_service_impl::ProfileLookupServiceImpl;
