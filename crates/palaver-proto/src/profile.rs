//! Agent profile and execution result records
//!
//! These are the JSON payloads carried inside `"beacon"` and `"results"`
//! frames. The profile is a typed record with the two fields the protocol
//! requires, plus a flattened extras map for host-driven additions.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ProtocolError;

/// Agent identity and operating parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique agent identifier; empty until assigned by negotiation
    #[serde(default)]
    pub paw: String,
    /// Beacon cadence in seconds, decided by the host
    #[serde(rename = "sleep")]
    pub sleep_seconds: u64,
    /// Host-driven optional fields, carried through verbatim
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl AgentProfile {
    /// Create a profile with the required fields
    pub fn new(paw: impl Into<String>, sleep_seconds: u64) -> Self {
        Self {
            paw: paw.into(),
            sleep_seconds,
            extra: HashMap::new(),
        }
    }

    /// Whether the agent already has an assigned identifier
    pub fn has_identity(&self) -> bool {
        !self.paw.is_empty()
    }

    /// Serialize the profile to heartbeat payload bytes
    pub fn to_bytes(&self) -> Result<Bytes, ProtocolError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

/// Outcome of one executed instruction, reported back to the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Instruction/link identifier this result answers
    pub id: String,
    /// Base64-encoded captured output
    pub output: String,
    /// Executor exit status
    pub status: i32,
    /// Process id of the executor, when one was spawned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Host-driven optional fields
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ExecutionResult {
    /// Create a result record
    pub fn new(id: impl Into<String>, output: impl Into<String>, status: i32) -> Self {
        Self {
            id: id.into(),
            output: output.into(),
            status,
            pid: None,
            extra: HashMap::new(),
        }
    }
}

/// Reporting envelope: the agent profile with a `results` array attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Profile fields, flattened into the envelope object
    #[serde(flatten)]
    pub profile: AgentProfile,
    /// Results being reported this cycle
    pub results: Vec<ExecutionResult>,
}

impl ResultEnvelope {
    /// Build an envelope from a profile copy and a batch of results
    pub fn new(profile: AgentProfile, results: Vec<ExecutionResult>) -> Self {
        Self { profile, results }
    }

    /// Serialize the envelope to results payload bytes
    pub fn to_bytes(&self) -> Result<Bytes, ProtocolError> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serializes_required_fields() {
        let profile = AgentProfile::new("abc123", 60);
        let value: Value = serde_json::from_slice(&profile.to_bytes().unwrap()).unwrap();
        assert_eq!(value["paw"], "abc123");
        assert_eq!(value["sleep"], 60);
    }

    #[test]
    fn test_profile_extras_flatten() {
        let mut profile = AgentProfile::new("abc123", 60);
        profile
            .extra
            .insert("platform".to_string(), Value::from("linux"));

        let value: Value = serde_json::from_slice(&profile.to_bytes().unwrap()).unwrap();
        assert_eq!(value["platform"], "linux");

        let back: AgentProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back.extra.get("platform"), Some(&Value::from("linux")));
    }

    #[test]
    fn test_profile_without_paw_deserializes_empty() {
        let profile: AgentProfile = serde_json::from_str(r#"{"sleep": 30}"#).unwrap();
        assert!(!profile.has_identity());
        assert_eq!(profile.sleep_seconds, 30);
    }

    #[test]
    fn test_envelope_layout() {
        let profile = AgentProfile::new("abc123", 60);
        let envelope = ResultEnvelope::new(
            profile,
            vec![ExecutionResult::new("link-1", "b3V0cHV0", 0)],
        );

        let value: Value = serde_json::from_slice(&envelope.to_bytes().unwrap()).unwrap();
        // Profile fields sit at the top level next to the results array.
        assert_eq!(value["paw"], "abc123");
        assert_eq!(value["results"][0]["id"], "link-1");
        assert_eq!(value["results"][0]["status"], 0);
        assert!(value["results"][0].get("pid").is_none());
    }
}
