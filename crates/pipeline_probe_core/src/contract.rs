use serde::{Deserialize, Serialize};

/// Synthetic event submitted to the compute function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerPayload {
    #[serde(rename = "test")]
    pub tag: String,
    pub timestamp: f64,
}

impl TriggerPayload {
    pub fn new(run_id: &str, index: usize, timestamp: f64) -> Self {
        Self {
            tag: trigger_tag(run_id, index),
            timestamp,
        }
    }
}

pub fn trigger_tag(run_id: &str, index: usize) -> String {
    format!("{run_id}-message-{index}")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionAck {
    pub status_code: i32,
}

impl SubmissionAck {
    pub fn is_accepted(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp_ms: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub key: String,
    pub size: i64,
    /// RFC 3339 timestamp as reported by the store, when present.
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageListing {
    pub key_count: usize,
    pub objects: Vec<ObjectDescriptor>,
}

impl StorageListing {
    pub fn from_objects(objects: Vec<ObjectDescriptor>) -> Self {
        Self {
            key_count: objects.len(),
            objects,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    pub body: String,
    pub receipt_handle: String,
}

/// Tagged result of a single verification stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum StageOutcome {
    Observed,
    NotObserved,
    Faulted(String),
}

impl StageOutcome {
    pub fn is_observed(&self) -> bool {
        matches!(self, Self::Observed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::NotObserved => "not_observed",
            Self::Faulted(_) => "faulted",
        }
    }
}
