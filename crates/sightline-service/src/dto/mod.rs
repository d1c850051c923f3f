//! Data Transfer Objects (DTOs).

mod profile_dto;

pub use profile_dto::*;
