//! # Sightline Core
//!
//! Core types, traits, and error definitions for Sightline.
//! Every other crate in the workspace builds on the profile and view-event
//! entities, the error taxonomy, and the seams defined here.

pub mod clock;
pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use clock::*;
pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
