//! Unique identifier types
//!
//! UUID-based identifiers for visitors occupying queue slots. Serialized in a
//! prefixed human-readable form (`VIS_<uuid>`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a visitor (or visitor group) in the park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitorId(pub Uuid);

impl VisitorId {
    /// Create a new random visitor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisitorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VIS_{}", self.0.simple())
    }
}

impl Serialize for VisitorId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("VIS_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for VisitorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Some(uuid_str) = s.strip_prefix("VIS_") {
            let uuid = Uuid::parse_str(uuid_str).map_err(serde::de::Error::custom)?;
            Ok(VisitorId(uuid))
        } else {
            // Fallback: accept a raw UUID as well
            let uuid = Uuid::parse_str(&s).map_err(serde::de::Error::custom)?;
            Ok(VisitorId(uuid))
        }
    }
}
