//! # gatekeep
//!
//! Composable validation units with ordered, short-circuiting orchestration.
//! Units are registered per input tag, sorted by priority when the registry
//! is sealed, and run against `serde_json::Value` inputs. Failures come back
//! as an ordered list of messages; units that cannot complete their check are
//! reported separately from ordinary failures.

pub mod config;
pub mod error;
pub mod logging;
pub mod nested;
pub mod orchestrator;
pub mod registry;
pub mod report;
pub mod traits;
pub mod units;

// Re-exports for easy access
pub use config::{ExecutionErrorPolicy, OrchestratorConfig};
pub use error::{ConfigError, OrchestratorError, RegistryError, UnitError, UnitResult};
pub use logging::{init_logging, LoggingConfig};
pub use nested::NestedUnit;
pub use orchestrator::Orchestrator;
pub use registry::Registry;
pub use report::{Finding, FindingKind, RequestReport, ValidationReport};
pub use traits::{Priority, ValidationUnit};

// Built-in units
pub use units::{
    CustomUnit, Denylist, DenylistHandle, Length, NotNull, Pattern, Prioritized, UnitExt,
};

pub use tokio_util::sync::CancellationToken;
