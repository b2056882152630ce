//! Ordered, short-circuiting execution of validation units

use crate::config::{ExecutionErrorPolicy, OrchestratorConfig};
use crate::error::{OrchestratorError, UnitError, UnitResult};
use crate::registry::Registry;
use crate::report::{Finding, RequestReport, ValidationReport};
use crate::traits::ValidationUnit;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs the units registered for a tag against an input.
///
/// Cheap to clone; clones share the same sealed registry.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<Registry>,
    config: OrchestratorConfig,
}

/// State of a single run. Never outlives or escapes the call that created it.
struct ValidationRun {
    findings: Vec<Finding>,
    halted: bool,
    cancelled: bool,
}

impl ValidationRun {
    fn new() -> Self {
        Self {
            findings: Vec::new(),
            halted: false,
            cancelled: false,
        }
    }

    fn into_report(self) -> ValidationReport {
        ValidationReport {
            findings: self.findings,
            halted: self.halted,
            cancelled: self.cancelled,
        }
    }
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration. Seals the registry.
    pub fn new(registry: Registry) -> Self {
        Self::with_config(Arc::new(registry), OrchestratorConfig::default())
    }

    /// Create an orchestrator over a shared registry. Seals the registry.
    pub fn with_config(registry: Arc<Registry>, config: OrchestratorConfig) -> Self {
        registry.seal();
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Validate an input against every unit registered for `tag`.
    ///
    /// Unknown tags have no units, so they produce an empty report.
    pub fn run(&self, tag: &str, input: &Value) -> Result<ValidationReport, OrchestratorError> {
        self.execute(tag, self.registry.units_for(tag), input, None)
    }

    /// Like [`run`](Self::run), checking `token` before each unit.
    ///
    /// A unit that has started always finishes; the findings gathered up to the
    /// cancellation point are returned with `cancelled` set.
    pub fn run_with_cancellation(
        &self,
        tag: &str,
        input: &Value,
        token: &CancellationToken,
    ) -> Result<ValidationReport, OrchestratorError> {
        self.execute(tag, self.registry.units_for(tag), input, Some(token))
    }

    /// Validate each registered tag against the matching field of `data`.
    ///
    /// Fields missing from `data` are validated as `Value::Null`. Fields
    /// without registered units are ignored.
    pub fn run_request(&self, data: &Map<String, Value>) -> Result<RequestReport, OrchestratorError> {
        let mut request = RequestReport::new();
        let absent = Value::Null;

        for tag in self.registry.tags() {
            let input = data.get(tag).unwrap_or(&absent);
            request.insert(tag, self.run(tag, input)?);
        }

        Ok(request)
    }

    /// Run an explicit unit sequence, in the order given, with this
    /// orchestrator's configuration.
    pub fn run_units(
        &self,
        tag: &str,
        units: &[Arc<dyn ValidationUnit>],
        input: &Value,
    ) -> Result<ValidationReport, OrchestratorError> {
        self.execute(tag, units, input, None)
    }

    fn execute(
        &self,
        tag: &str,
        units: &[Arc<dyn ValidationUnit>],
        input: &Value,
        token: Option<&CancellationToken>,
    ) -> Result<ValidationReport, OrchestratorError> {
        let span = tracing::debug_span!("validation_run", tag = %tag, units = units.len());
        let _enter = span.enter();

        let mut run = ValidationRun::new();

        for unit in units {
            if run.halted {
                break;
            }

            if token.is_some_and(CancellationToken::is_cancelled) {
                tracing::debug!(findings = run.findings.len(), "validation run cancelled");
                run.cancelled = true;
                break;
            }

            tracing::trace!(unit = unit.name(), priority = unit.priority(), "evaluating unit");

            match self.evaluate(unit.as_ref(), input) {
                Ok(messages) => {
                    if messages.is_empty() {
                        continue;
                    }

                    run.findings.extend(
                        messages
                            .into_iter()
                            .map(|message| Finding::failure(unit.name(), message)),
                    );

                    if unit.stop_on_error() {
                        tracing::debug!(unit = unit.name(), "unit failed, halting run");
                        run.halted = true;
                    }
                }
                Err(error) => {
                    tracing::warn!(unit = unit.name(), error = %error, "validation unit failed to execute");

                    run.findings.extend(
                        error
                            .preceding()
                            .iter()
                            .map(|message| Finding::failure(unit.name(), message.clone())),
                    );

                    match self.config.execution_error_policy {
                        ExecutionErrorPolicy::Record => {
                            run.findings
                                .push(Finding::execution_error(unit.name(), error.to_string()));
                            run.halted = true;
                        }
                        ExecutionErrorPolicy::Abort => {
                            return Err(OrchestratorError::UnitExecution {
                                tag: tag.to_string(),
                                source: error,
                                findings: run.findings,
                            });
                        }
                    }
                }
            }
        }

        tracing::debug!(
            findings = run.findings.len(),
            halted = run.halted,
            "validation run finished"
        );
        Ok(run.into_report())
    }

    fn evaluate(&self, unit: &dyn ValidationUnit, input: &Value) -> UnitResult {
        let result = if self.config.catch_panics {
            // Units only get shared access to the input and own no run state.
            panic::catch_unwind(AssertUnwindSafe(|| unit.evaluate(input))).unwrap_or_else(
                |payload| Err(UnitError::panicked(unit.name(), panic_message(&*payload))),
            )
        } else {
            unit.evaluate(input)
        };

        let messages = result?;
        if messages.iter().any(|message| message.trim().is_empty()) {
            return Err(UnitError::failed(unit.name(), "produced a blank failure message"));
        }
        Ok(messages)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
