//! Result type aliases for Sightline.

use crate::SightlineError;

/// A specialized `Result` type for Sightline operations.
pub type SightlineResult<T> = Result<T, SightlineError>;
