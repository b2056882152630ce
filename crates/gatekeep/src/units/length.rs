//! Length bounds for strings and arrays

use crate::error::UnitResult;
use crate::traits::ValidationUnit;
use serde_json::Value;

/// Checks the length of a string (in characters) or an array.
///
/// Absent input passes; pair it with [`NotNull`](super::NotNull) to require a value.
#[derive(Debug, Clone, Default)]
pub struct Length {
    /// Minimum length (inclusive)
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    pub max: Option<usize>,
    /// Custom error message
    pub message: Option<String>,
}

impl Length {
    /// Create a length check with no bounds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: usize, max: usize) -> Self {
        self.min(min).max(max)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn length_of(value: &Value) -> Option<usize> {
        match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    fn error_message(&self) -> String {
        if let Some(ref message) = self.message {
            return message.clone();
        }

        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => format!("must be exactly {} long", min),
            (Some(min), Some(max)) => format!("must be between {} and {} long", min, max),
            (Some(min), None) => format!("must be at least {} long", min),
            (None, Some(max)) => format!("must be at most {} long", max),
            (None, None) => "has invalid length".to_string(),
        }
    }
}

impl ValidationUnit for Length {
    fn evaluate(&self, input: &Value) -> UnitResult {
        if input.is_null() {
            return Ok(Vec::new());
        }

        let Some(length) = Self::length_of(input) else {
            return Ok(vec!["must be a string or array".to_string()]);
        };

        let too_short = self.min.is_some_and(|min| length < min);
        let too_long = self.max.is_some_and(|max| length > max);

        if too_short || too_long {
            Ok(vec![self.error_message()])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "length"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({
            "min": self.min,
            "max": self.max,
            "message": self.message,
        }))
    }
}
