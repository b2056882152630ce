//! Regular expression check

use crate::error::UnitResult;
use crate::traits::ValidationUnit;
use regex::Regex;
use serde_json::Value;

/// Requires a string input to match a regular expression.
///
/// By default the whole string must match. Absent input passes.
#[derive(Debug, Clone)]
pub struct Pattern {
    pattern: Regex,
    anchored: Regex,
    /// Custom error message
    pub message: Option<String>,
    /// Match the entire string (default) or any substring
    pub full_match: bool,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Self::from_regex(Regex::new(pattern)?)
    }

    pub fn from_regex(pattern: Regex) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern.as_str()))?;
        Ok(Self {
            pattern,
            anchored,
            message: None,
            full_match: true,
        })
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn full_match(mut self, full_match: bool) -> Self {
        self.full_match = full_match;
        self
    }

    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }

    fn matches(&self, text: &str) -> bool {
        if self.full_match {
            self.anchored.is_match(text)
        } else {
            self.pattern.is_match(text)
        }
    }
}

impl ValidationUnit for Pattern {
    fn evaluate(&self, input: &Value) -> UnitResult {
        let text = match input {
            Value::Null => return Ok(Vec::new()),
            Value::String(text) => text,
            _ => return Ok(vec!["must be a string".to_string()]),
        };

        if self.matches(text) {
            return Ok(Vec::new());
        }

        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("does not match pattern {}", self.pattern.as_str()));
        Ok(vec![message])
    }

    fn name(&self) -> &str {
        "pattern"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({
            "pattern": self.pattern.as_str(),
            "full_match": self.full_match,
            "message": self.message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_match() {
        let unit = Pattern::new(r"[a-z0-9_]+").unwrap();
        assert!(unit.evaluate(&json!("alice_01")).unwrap().is_empty());
        assert_eq!(unit.evaluate(&json!("Alice!")).unwrap().len(), 1);
    }

    #[test]
    fn test_full_match_tries_every_alternative() {
        let unit = Pattern::new(r"a|ab").unwrap();
        assert!(unit.evaluate(&json!("ab")).unwrap().is_empty());
    }

    #[test]
    fn test_partial_match() {
        let unit = Pattern::new(r"\d").unwrap().full_match(false);
        assert!(unit.evaluate(&json!("abc1")).unwrap().is_empty());
        assert_eq!(unit.evaluate(&json!("abc")).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_pattern_is_a_construction_error() {
        assert!(Pattern::new("(unclosed").is_err());
    }

    #[test]
    fn test_non_strings() {
        let unit = Pattern::new(r".*").unwrap().message("bad format");
        assert!(unit.evaluate(&Value::Null).unwrap().is_empty());
        assert_eq!(unit.evaluate(&json!(5)).unwrap(), vec!["must be a string"]);
    }
}
