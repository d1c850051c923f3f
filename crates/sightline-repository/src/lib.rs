//! # Sightline Repository
//!
//! Storage collaborators behind the profile lookup core:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProfileRepository>     (profile store)
//!   ↓  Arc<dyn ViewEventRepository>   (append-only view ledger)
//! MySqlProfileRepository / MySqlViewEventRepository   (SQLx)
//! InMemoryProfileRepository / InMemoryViewEventRepository
//! ```
//!
//! Every storage failure surfaces as `SightlineError::StorageUnavailable`.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::*;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
