//! MySQL repository implementations.

mod profile_repository;
mod view_event_repository;

pub use profile_repository::MySqlProfileRepository;
pub use view_event_repository::MySqlViewEventRepository;
