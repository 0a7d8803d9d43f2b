//! Message envelope and schema versioning

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Current protocol schema version
pub const PROTOCOL_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

/// Protocol error types
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Incompatible schema version: received {received}, current {current}")]
    IncompatibleVersion {
        received: SchemaVersion,
        current: SchemaVersion,
    },
}

/// Unique identifier for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random message ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a message ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// Schema version for a message payload
///
/// Same major version means compatible; minor versions add
/// backward-compatible fields only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    /// Creates a new schema version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Checks compatibility with another version
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// A message envelope: action, version, and a JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub id: MessageId,
    pub action: String,
    pub schema_version: SchemaVersion,
    payload: String,
}

impl Envelope {
    /// Wraps a payload under an action with the current schema version
    pub fn new<T: Serialize>(action: &str, payload: &T) -> Result<Self, ProtocolError> {
        Ok(Self {
            id: MessageId::new(),
            action: action.to_string(),
            schema_version: PROTOCOL_SCHEMA_VERSION,
            payload: serde_json::to_string(payload)?,
        })
    }

    /// Deserializes the payload into its typed form
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        Ok(serde_json::from_str(&self.payload)?)
    }

    /// Checks the envelope's version against the current protocol version
    pub fn check_version(&self) -> Result<(), ProtocolError> {
        if self.schema_version.is_compatible_with(&PROTOCOL_SCHEMA_VERSION) {
            Ok(())
        } else {
            Err(ProtocolError::IncompatibleVersion {
                received: self.schema_version,
                current: PROTOCOL_SCHEMA_VERSION,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn test_envelope_roundtrip() {
        let envelope = Envelope::new("probe", &Probe { value: 7 }).unwrap();
        assert_eq!(envelope.action, "probe");
        assert_eq!(envelope.schema_version, PROTOCOL_SCHEMA_VERSION);
        let decoded: Probe = envelope.payload().unwrap();
        assert_eq!(decoded, Probe { value: 7 });
    }

    #[test]
    fn test_version_compatibility() {
        let v1_0 = SchemaVersion::new(1, 0);
        let v1_3 = SchemaVersion::new(1, 3);
        let v2_0 = SchemaVersion::new(2, 0);
        assert!(v1_0.is_compatible_with(&v1_3));
        assert!(!v1_0.is_compatible_with(&v2_0));
    }

    #[test]
    fn test_incompatible_envelope_rejected() {
        let mut envelope = Envelope::new("probe", &Probe { value: 1 }).unwrap();
        envelope.schema_version = SchemaVersion::new(99, 0);
        assert!(matches!(
            envelope.check_version(),
            Err(ProtocolError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }
}
