//! Typed ID wrappers for domain entities.

use crate::{SightlineError, SightlineResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Maximum accepted length of a profile identity, in characters.
pub const MAX_IDENTITY_LEN: usize = 128;

/// The unique key naming a profile, such as an account or wallet address.
///
/// Identities are compared exactly; they are trimmed on parse but never
/// case-folded, because some address schemes are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Parses an identity, rejecting empty or oversized input.
    pub fn parse(raw: &str) -> SightlineResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SightlineError::invalid_argument("Profile identity must not be empty"));
        }
        if trimmed.chars().count() > MAX_IDENTITY_LEN {
            return Err(SightlineError::invalid_argument(format!(
                "Profile identity exceeds {} characters",
                MAX_IDENTITY_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a value already known to be a valid identity (e.g. read back from storage).
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A strongly-typed wrapper for view event IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewEventId(pub Uuid);

impl ViewEventId {
    /// Creates a new time-ordered view event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a view event ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a view event ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ViewEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ViewEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_id_parse_trims() {
        let id = ProfileId::parse("  0xAbC123 ").unwrap();
        assert_eq!(id.as_str(), "0xAbC123");
        assert_eq!(id.to_string(), "0xAbC123");
    }

    #[test]
    fn test_profile_id_rejects_empty() {
        let err = ProfileId::parse("   ").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_profile_id_rejects_oversized() {
        let raw = "a".repeat(MAX_IDENTITY_LEN + 1);
        assert!(ProfileId::parse(&raw).is_err());
        assert!(ProfileId::parse(&raw[..MAX_IDENTITY_LEN]).is_ok());
    }

    #[test]
    fn test_profile_id_length_counts_characters() {
        let accented = "é".repeat(MAX_IDENTITY_LEN);
        assert!(accented.len() > MAX_IDENTITY_LEN);
        assert_eq!(ProfileId::parse(&accented).unwrap().as_str(), accented);

        let oversized = "é".repeat(MAX_IDENTITY_LEN + 1);
        assert!(ProfileId::parse(&oversized).is_err());
    }

    #[test]
    fn test_view_event_id_creation() {
        let id1 = ViewEventId::new();
        let id2 = ViewEventId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_view_event_id_parsing() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = ViewEventId::parse(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }
}
