//! Orchestrator configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const ENV_EXECUTION_ERROR_POLICY: &str = "GATEKEEP_EXECUTION_ERROR_POLICY";
pub const ENV_CATCH_PANICS: &str = "GATEKEEP_CATCH_PANICS";

/// What the orchestrator does when a unit cannot complete its check
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionErrorPolicy {
    /// Record an execution-error finding and halt the run
    #[default]
    Record,
    /// Abandon the run and return the error to the caller
    Abort,
}

impl FromStr for ExecutionErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "record" => Ok(ExecutionErrorPolicy::Record),
            "abort" => Ok(ExecutionErrorPolicy::Abort),
            _ => Err(ConfigError::InvalidValue {
                field: "execution_error_policy".to_string(),
                value: s.to_string(),
                expected: "record or abort".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ExecutionErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let policy = match self {
            ExecutionErrorPolicy::Record => "record",
            ExecutionErrorPolicy::Abort => "abort",
        };
        write!(f, "{}", policy)
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub execution_error_policy: ExecutionErrorPolicy,
    /// Turn panics inside units into execution errors
    pub catch_panics: bool,
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self {
            execution_error_policy: ExecutionErrorPolicy::Record,
            catch_panics: true,
        }
    }

    /// Abort runs on the first execution error
    pub fn aborting() -> Self {
        Self {
            execution_error_policy: ExecutionErrorPolicy::Abort,
            ..Self::new()
        }
    }

    pub fn with_policy(mut self, policy: ExecutionErrorPolicy) -> Self {
        self.execution_error_policy = policy;
        self
    }

    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(policy) = env::var(ENV_EXECUTION_ERROR_POLICY) {
            config.execution_error_policy = policy.parse()?;
        }

        if let Ok(catch_panics) = env::var(ENV_CATCH_PANICS) {
            config.catch_panics = parse_bool("catch_panics", &catch_panics)?;
        }

        config.warn_on_uncaught_panics();
        Ok(config)
    }

    /// Whether a panicking unit unwinds out of `run` instead of being recorded
    pub fn panics_escape_runs(&self) -> bool {
        !self.catch_panics
    }

    /// Log a warning when panics would bypass the execution error policy
    pub fn warn_on_uncaught_panics(&self) {
        if self.panics_escape_runs() {
            tracing::warn!(
                policy = %self.execution_error_policy,
                "panicking units will unwind through runs: catch_panics is disabled"
            );
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}
