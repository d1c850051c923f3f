//! Profile and view-event entities.

mod profile;
mod view_event;

pub use profile::*;
pub use view_event::*;
