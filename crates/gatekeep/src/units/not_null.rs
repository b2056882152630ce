//! Not-null gate

use crate::error::UnitResult;
use crate::traits::ValidationUnit;
use serde_json::Value;

/// Fails when the input is absent (`Value::Null`).
///
/// Stops the run by default, so later units can assume a present value.
/// With [`reject_blank`](Self::reject_blank), blank strings and empty arrays
/// or objects count as absent too.
#[derive(Debug, Clone)]
pub struct NotNull {
    /// Custom error message
    pub message: Option<String>,
    /// Treat blank strings and empty collections as absent
    pub reject_blank: bool,
}

impl NotNull {
    /// Create a new not-null gate with the default message
    pub fn new() -> Self {
        Self {
            message: None,
            reject_blank: false,
        }
    }

    /// Create a not-null gate with a custom message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            reject_blank: false,
        }
    }

    pub fn reject_blank(mut self) -> Self {
        self.reject_blank = true;
        self
    }

    fn is_absent(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) if self.reject_blank => s.trim().is_empty(),
            Value::Array(arr) if self.reject_blank => arr.is_empty(),
            Value::Object(obj) if self.reject_blank => obj.is_empty(),
            _ => false,
        }
    }
}

impl Default for NotNull {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationUnit for NotNull {
    fn evaluate(&self, input: &Value) -> UnitResult {
        if !self.is_absent(input) {
            return Ok(Vec::new());
        }

        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "value is required".to_string());
        Ok(vec![message])
    }

    fn name(&self) -> &str {
        "not_null"
    }

    fn stop_on_error(&self) -> bool {
        true
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({
            "message": self.message,
            "reject_blank": self.reject_blank,
        }))
    }
}
