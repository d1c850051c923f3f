//! Domain entities for Sightline.

pub mod entities;

pub use entities::*;
