//! # Sightline Server Library
//!
//! Composition root for the Sightline server: wires configuration, storage,
//! the profile cache, view accounting and the HTTP router together.

pub mod app;
pub mod startup;
