//! Structured event values with fixed JSON schemas.
//!
//! Each event is built from borrowed engine data, serialized once, posted,
//! and discarded. Field names are part of the wire contract with the
//! consumer side and must not change.

use crate::error::BridgeResult;
use serde::Serialize;

/// A database-level change: one or more documents changed in a commit.
///
/// Schema: `{"databaseId": string, "docIDs": [string]}`. An empty change
/// set serializes as an empty array, never an absent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseChange {
    /// Identifier of the database the change occurred in.
    #[serde(rename = "databaseId")]
    pub database_id: String,
    /// IDs of the changed documents, in engine order.
    #[serde(rename = "docIDs")]
    pub doc_ids: Vec<String>,
}

impl DatabaseChange {
    /// Serializes the event to its wire form.
    pub fn to_json(&self) -> BridgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A single-document change.
///
/// Schema: `{"databaseId": string, "documentId": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentChange {
    /// Identifier of the database the document lives in.
    #[serde(rename = "databaseId")]
    pub database_id: String,
    /// ID of the changed document.
    #[serde(rename = "documentId")]
    pub document_id: String,
}

impl DocumentChange {
    /// Serializes the event to its wire form.
    pub fn to_json(&self) -> BridgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Replicator activity levels, numeric codes fixed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicatorActivity {
    /// Replication finished or failed permanently.
    Stopped,
    /// No network connectivity.
    Offline,
    /// Connecting to the remote.
    Connecting,
    /// Connected, nothing to transfer.
    Idle,
    /// Actively transferring documents.
    Busy,
}

impl ReplicatorActivity {
    /// Returns the engine's numeric code for this level.
    pub fn code(self) -> u8 {
        match self {
            ReplicatorActivity::Stopped => 0,
            ReplicatorActivity::Offline => 1,
            ReplicatorActivity::Connecting => 2,
            ReplicatorActivity::Idle => 3,
            ReplicatorActivity::Busy => 4,
        }
    }

    /// Maps an engine activity code back to a level.
    ///
    /// Unknown codes map to `Stopped`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => ReplicatorActivity::Offline,
            2 => ReplicatorActivity::Connecting,
            3 => ReplicatorActivity::Idle,
            4 => ReplicatorActivity::Busy,
            _ => ReplicatorActivity::Stopped,
        }
    }
}

/// Replication progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplicatorProgress {
    /// Documents transferred so far.
    #[serde(rename = "documentCount")]
    pub document_count: u64,
    /// Fraction of the total estimated work completed, 0.0 to 1.0.
    #[serde(rename = "fractionComplete")]
    pub fraction_complete: f32,
}

/// Error triple attached to a replicator status update.
///
/// Always present in the payload. The no-error case is all-zero fields and
/// an empty message; consumers rely on the fixed schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicatorErrorInfo {
    /// Engine error code, 0 when no error.
    pub code: i32,
    /// Engine error domain, 0 when no error.
    pub domain: i32,
    /// Platform-specific auxiliary code, 0 when no error.
    pub internal_info: i32,
    /// Human-readable message from the engine's error formatter.
    pub message: String,
}

impl ReplicatorErrorInfo {
    /// The "no error" value.
    pub fn none() -> Self {
        Self {
            code: 0,
            domain: 0,
            internal_info: 0,
            message: String::new(),
        }
    }

    /// Returns true if this represents "no error".
    pub fn is_none(&self) -> bool {
        self.code == 0 && self.domain == 0 && self.internal_info == 0
    }
}

/// A replicator status update.
///
/// Schema: `{"id": string, "type": "status", "activity": int,
/// "progress": {"documentCount": uint, "fractionComplete": float},
/// "error": {"code": int, "domain": int, "internal_info": int,
/// "message": string}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicatorStatusEvent {
    /// Identifier of the replicator instance.
    pub id: String,
    /// Message discriminator, always `"status"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Activity level code.
    pub activity: u8,
    /// Progress counters.
    pub progress: ReplicatorProgress,
    /// Error triple, zeroed when there is no error.
    pub error: ReplicatorErrorInfo,
}

impl ReplicatorStatusEvent {
    /// Builds a status event.
    pub fn new(
        id: impl Into<String>,
        activity: ReplicatorActivity,
        progress: ReplicatorProgress,
        error: ReplicatorErrorInfo,
    ) -> Self {
        Self {
            id: id.into(),
            kind: "status",
            activity: activity.code(),
            progress,
            error,
        }
    }

    /// Serializes the event to its wire form.
    pub fn to_json(&self) -> BridgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
