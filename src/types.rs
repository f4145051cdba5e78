//! # Task Types
//!
//! Payloads sent to `/submit_task`, the identifiers it hands back, and the
//! classification of `/get_result` bodies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ClientError, ClientResult};

/// Key injected into every payload with the destination queue name
pub const QUEUE_KEY: &str = "queue";
/// Key carrying the identifier in a submission response
pub const TASK_ID_KEY: &str = "task_id";
/// Key whose presence marks a result body as ready
pub const RESULT_KEY: &str = "result";

/// Caller-supplied task data
///
/// An arbitrary JSON object. Its contents are not validated; the client only
/// sets the `queue` key before submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskPayload(Map<String, Value>);

impl TaskPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, returning the payload for chaining
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set the destination queue, overwriting any existing `queue` value
    pub fn set_queue(&mut self, queue_name: &str) {
        self.0
            .insert(QUEUE_KEY.to_string(), Value::String(queue_name.to_string()));
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for TaskPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for TaskPayload {
    type Error = ClientError;

    fn try_from(value: Value) -> ClientResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ClientError::InvalidInput(format!(
                "Task payload must be a JSON object, got: {}",
                other
            ))),
        }
    }
}

/// Opaque task identifier returned by the service
///
/// The default value is the empty string, which is what the best-effort
/// submission returns when no identifier could be obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract the identifier from a submission response body
    ///
    /// Strings are taken as-is and numbers are rendered as decimal text.
    /// Anything else counts as missing.
    pub fn from_response(body: &Value) -> Option<Self> {
        match body.get(TASK_ID_KEY)? {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Classification of a single `/get_result` response body
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The body carries a `result` key
    Ready(Value),
    /// The body parsed but has no `result` yet
    Pending(Value),
}

impl PollOutcome {
    pub fn from_body(body: Value) -> Self {
        if has_result(&body) {
            Self::Ready(body)
        } else {
            Self::Pending(body)
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The full response body, ready or not
    pub fn into_body(self) -> Value {
        match self {
            Self::Ready(body) | Self::Pending(body) => body,
        }
    }
}

/// Whether a parsed response body contains the `result` key
pub fn has_result(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|obj| obj.contains_key(RESULT_KEY))
}
