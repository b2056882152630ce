//! Validation reports returned by the orchestrator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What a finding records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The input did not satisfy the unit
    Failure,
    /// The unit could not complete its check
    ExecutionError,
}

/// One message produced during a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    /// Name of the unit that produced the message
    pub unit: String,
    pub kind: FindingKind,
    /// Human-readable message
    pub message: String,
}

impl Finding {
    pub fn failure(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            kind: FindingKind::Failure,
            message: message.into(),
        }
    }

    pub fn execution_error(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            kind: FindingKind::ExecutionError,
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == FindingKind::Failure
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FindingKind::Failure => write!(f, "{}", self.message),
            FindingKind::ExecutionError => write!(f, "[{}] {}", self.unit, self.message),
        }
    }
}

/// Outcome of one orchestration call over a single tag.
///
/// Findings are kept in the exact order they were produced, which is the
/// sealed priority order of the units.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    /// A unit stopped the run early
    pub halted: bool,
    /// The run was cancelled between two units
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// No findings of any kind
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    /// All messages in production order, execution errors included
    pub fn messages(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.message.as_str()).collect()
    }

    /// Validation failures only
    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind == FindingKind::Failure)
    }

    /// Execution errors only
    pub fn execution_errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.kind == FindingKind::ExecutionError)
    }

    pub fn has_execution_errors(&self) -> bool {
        self.execution_errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.findings.is_empty() {
            return write!(f, "No validation errors");
        }

        write!(f, "Validation failed with {} message(s):", self.findings.len())?;
        for finding in &self.findings {
            write!(f, "\n  {}", finding)?;
        }
        if self.halted {
            write!(f, "\n  (halted early)")?;
        }
        Ok(())
    }
}

/// Reports for every tag of a request, in tag order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestReport {
    pub fields: BTreeMap<String, ValidationReport>,
}

impl RequestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, report: ValidationReport) {
        self.fields.insert(tag.into(), report);
    }

    /// Every tag passed
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(ValidationReport::is_valid)
    }

    /// Report for a tag, if it was validated
    pub fn get(&self, tag: &str) -> Option<&ValidationReport> {
        self.fields.get(tag)
    }

    /// Tags with at least one finding
    pub fn invalid_tags(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, report)| !report.is_valid())
            .map(|(tag, _)| tag.as_str())
            .collect()
    }

    /// Total number of findings across all tags
    pub fn total_findings(&self) -> usize {
        self.fields.values().map(ValidationReport::len).sum()
    }

    /// Convert to the JSON shape used for API error responses
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .filter(|(_, report)| !report.is_valid())
            .map(|(tag, report)| (tag.clone(), serde_json::json!(report.findings)))
            .collect();

        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "fields": fields
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(findings: Vec<Finding>, halted: bool) -> ValidationReport {
        ValidationReport {
            findings,
            halted,
            cancelled: false,
        }
    }

    #[test]
    fn test_report_separates_kinds() {
        let report = report(
            vec![
                Finding::failure("not_null", "username is required"),
                Finding::execution_error("lookup", "backend unavailable"),
            ],
            true,
        );

        assert!(!report.is_valid());
        assert_eq!(report.messages(), vec!["username is required", "backend unavailable"]);
        assert_eq!(report.failures().count(), 1);
        assert!(report.has_execution_errors());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValidationReport::new().to_string(), "No validation errors");

        let report = report(vec![Finding::failure("length", "too long")], true);
        let text = report.to_string();
        assert!(text.contains("too long"));
        assert!(text.contains("halted"));
    }

    #[test]
    fn test_request_report_json_lists_only_invalid_tags() {
        let mut request = RequestReport::new();
        request.insert("email", ValidationReport::new());
        request.insert("username", report(vec![Finding::failure("not_null", "null")], true));

        assert!(!request.is_valid());
        assert_eq!(request.invalid_tags(), vec!["username"]);
        assert_eq!(request.total_findings(), 1);

        let json = request.to_json();
        assert_eq!(json["error"]["code"], "validation_failed");
        assert_eq!(json["error"]["fields"]["username"][0]["message"], "null");
        assert_eq!(json["error"]["fields"]["username"][0]["kind"], "failure");
        assert!(json["error"]["fields"].get("email").is_none());
    }

    #[test]
    fn test_cancelled_flag_is_omitted_when_false() {
        let json = serde_json::to_value(ValidationReport::new()).unwrap();
        assert!(json.get("cancelled").is_none());
        assert_eq!(json["halted"], false);
    }
}
