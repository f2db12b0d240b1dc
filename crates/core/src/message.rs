use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// Placeholder shown when a payload carries no usable `type` field
pub const UNKNOWN_TYPE: &str = "unknown";

/// One JSON payload received from the probed endpoint.
///
/// No schema is enforced; the only field the probe looks at is the
/// top-level `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeMessage(Value);

impl ProbeMessage {
    pub fn new(data: Value) -> Self {
        Self(data)
    }

    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// The `type` field: strings come back raw, any other JSON value in its
    /// compact rendering, and [`UNKNOWN_TYPE`] when the field is missing or
    /// the payload is not an object.
    pub fn message_type(&self) -> Cow<'_, str> {
        match self.0.get("type") {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Borrowed(UNKNOWN_TYPE),
        }
    }

    pub fn data(&self) -> &Value {
        &self.0
    }

    pub fn into_data(self) -> Value {
        self.0
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<Value> for ProbeMessage {
    fn from(data: Value) -> Self {
        Self(data)
    }
}
