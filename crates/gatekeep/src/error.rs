//! Error types for units, the registry and the orchestrator

use crate::report::Finding;
use thiserror::Error;

/// Result of evaluating a single unit: the ordered failure messages it produced.
///
/// An empty vector means the unit passed.
pub type UnitResult = Result<Vec<String>, UnitError>;

/// A unit could not complete its check.
///
/// This is never a validation failure. Failures are ordinary messages in a
/// [`UnitResult`]; a `UnitError` means the check itself did not run to completion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("unit '{unit}' failed to execute: {message}")]
    Failed { unit: String, message: String },

    #[error("unit '{unit}' panicked: {message}")]
    Panicked { unit: String, message: String },

    /// A unit of a nested run failed to execute.
    ///
    /// `preceding` holds the failure messages the nested run produced before
    /// the error, in order.
    #[error("nested run of '{unit}' failed in '{inner}': {message}")]
    Nested {
        unit: String,
        inner: String,
        message: String,
        preceding: Vec<String>,
    },
}

impl UnitError {
    /// Create an execution failure for the named unit
    pub fn failed(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Create a panic diagnostic for the named unit
    pub fn panicked(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panicked {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Name of the unit that raised the error
    pub fn unit(&self) -> &str {
        match self {
            Self::Failed { unit, .. } | Self::Panicked { unit, .. } | Self::Nested { unit, .. } => {
                unit
            }
        }
    }

    /// Failure messages produced before the error. Only nested runs have any.
    pub fn preceding(&self) -> &[String] {
        match self {
            Self::Nested { preceding, .. } => preceding,
            Self::Failed { .. } | Self::Panicked { .. } => &[],
        }
    }
}

/// Setup-time registry misuse. Always reported from `register`, never at run time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry is sealed; cannot register '{unit}' for '{tag}' after the first read")]
    Sealed { tag: String, unit: String },

    #[error("unit '{unit}' is already registered for '{tag}'")]
    DuplicateUnit { tag: String, unit: String },
}

/// Errors surfaced by an orchestration call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    /// Only produced under [`ExecutionErrorPolicy::Abort`](crate::config::ExecutionErrorPolicy::Abort).
    #[error("validation of '{tag}' aborted: {source}")]
    UnitExecution {
        tag: String,
        #[source]
        source: UnitError,
        /// Findings recorded before the run was aborted
        findings: Vec<Finding>,
    },
}

impl OrchestratorError {
    /// The unit error that aborted the run
    pub fn unit_error(&self) -> &UnitError {
        match self {
            Self::UnitExecution { source, .. } => source,
        }
    }

    /// Findings the aborted run had recorded, in production order
    pub fn findings(&self) -> &[Finding] {
        match self {
            Self::UnitExecution { findings, .. } => findings,
        }
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Invalid logging filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Logging initialization failed: {message}")]
    LoggingInit { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_error_reports_unit_name() {
        let error = UnitError::failed("denylist", "lookup failed");
        assert_eq!(error.unit(), "denylist");
        assert_eq!(
            error.to_string(),
            "unit 'denylist' failed to execute: lookup failed"
        );

        let error = UnitError::panicked("length", "index out of bounds");
        assert_eq!(error.unit(), "length");
        assert!(error.preceding().is_empty());
    }

    #[test]
    fn test_nested_error_keeps_preceding_messages() {
        let error = UnitError::Nested {
            unit: "username".to_string(),
            inner: "lookup".to_string(),
            message: "timeout".to_string(),
            preceding: vec!["too short".to_string()],
        };

        assert_eq!(error.unit(), "username");
        assert_eq!(error.preceding(), ["too short".to_string()]);
        assert_eq!(error.to_string(), "nested run of 'username' failed in 'lookup': timeout");
    }

    #[test]
    fn test_orchestrator_error_exposes_source() {
        let error = OrchestratorError::UnitExecution {
            tag: "username".to_string(),
            source: UnitError::failed("lookup", "timeout"),
            findings: vec![Finding::failure("not_null", "username is required")],
        };

        assert_eq!(error.unit_error().unit(), "lookup");
        assert_eq!(error.findings().len(), 1);
        assert!(error.to_string().contains("username"));
    }

    #[test]
    fn test_registry_error_messages() {
        let sealed = RegistryError::Sealed {
            tag: "email".to_string(),
            unit: "not_null".to_string(),
        };
        assert!(sealed.to_string().contains("sealed"));

        let duplicate = RegistryError::DuplicateUnit {
            tag: "email".to_string(),
            unit: "not_null".to_string(),
        };
        assert!(duplicate.to_string().contains("already registered"));
    }
}
