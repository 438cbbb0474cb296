//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Creates a new random ConversationId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConversationId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of the user owning a conversation.
///
/// Owner ids become path components in the file store, so path separators
/// are rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning an error if empty or unsafe as a path segment.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        if id.contains('/') || id.contains('\\') || id.contains("..") {
            return Err(ValidationError::invalid_format(
                "user_id",
                "must not contain path separators",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod conversation_id {
        use super::*;

        #[test]
        fn generates_unique_values() {
            let id1 = ConversationId::new();
            let id2 = ConversationId::new();
            assert_ne!(id1, id2);
        }

        #[test]
        fn parses_from_valid_string() {
            let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
            let id: ConversationId = uuid_str.parse().unwrap();
            assert_eq!(id.to_string(), uuid_str);
        }

        #[test]
        fn rejects_invalid_string() {
            let result: Result<ConversationId, _> = "not-a-uuid".parse();
            assert!(result.is_err());
        }
    }

    mod message_id {
        use super::*;

        #[test]
        fn generates_unique_values() {
            let id1 = MessageId::new();
            let id2 = MessageId::new();
            assert_ne!(id1, id2);
        }

        #[test]
        fn from_uuid_preserves_value() {
            let uuid = Uuid::new_v4();
            let id = MessageId::from_uuid(uuid);
            assert_eq!(id.as_uuid(), &uuid);
        }
    }

    mod user_id {
        use super::*;

        #[test]
        fn accepts_simple_identifier() {
            let id = UserId::new("default_user").unwrap();
            assert_eq!(id.as_str(), "default_user");
        }

        #[test]
        fn rejects_empty_identifier() {
            assert!(UserId::new("").is_err());
        }

        #[test]
        fn rejects_path_traversal() {
            assert!(UserId::new("../etc").is_err());
            assert!(UserId::new("a/b").is_err());
            assert!(UserId::new("a\\b").is_err());
        }

        #[test]
        fn serializes_transparently() {
            let id = UserId::new("alice").unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"alice\"");
        }
    }
}
