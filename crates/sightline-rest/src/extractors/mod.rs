//! Custom Axum extractors.

mod viewer;

pub use viewer::*;
