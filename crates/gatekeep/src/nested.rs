//! Gate units that delegate to a nested orchestrator
//!
//! A [`NestedUnit`] factors a shared precondition out of a batch of checks.
//! The gate runs first; if it fails, its messages are the unit's result and
//! the nested checks never run. Otherwise the nested orchestrator validates
//! the same input with the usual ordering and short-circuit rules, and its
//! messages are flattened into the outer run. When a nested unit fails to
//! execute, the messages gathered before it travel with the resulting
//! [`UnitError::Nested`], so the outer run records the same findings a flat
//! run would.

use crate::error::{UnitError, UnitResult};
use crate::orchestrator::Orchestrator;
use crate::registry::Registry;
use crate::report::Finding;
use crate::traits::{Priority, ValidationUnit};
use crate::units::NotNull;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct NestedUnit {
    name: String,
    priority: Priority,
    stop_on_error: bool,
    gate: Arc<dyn ValidationUnit>,
    inner: Orchestrator,
    inner_tag: String,
}

impl std::fmt::Debug for NestedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedUnit")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("stop_on_error", &self.stop_on_error)
            .field("gate", &self.gate.name())
            .field("inner_tag", &self.inner_tag)
            .finish()
    }
}

impl NestedUnit {
    /// Gate `inner_tag` of `inner` behind `gate`
    pub fn new<G>(
        name: impl Into<String>,
        gate: G,
        inner: Orchestrator,
        inner_tag: impl Into<String>,
    ) -> Self
    where
        G: ValidationUnit + 'static,
    {
        Self {
            name: name.into(),
            priority: 0,
            stop_on_error: false,
            gate: Arc::new(gate),
            inner,
            inner_tag: inner_tag.into(),
        }
    }

    /// Gate every unit of `registry` behind a not-null check.
    ///
    /// The units are registered under `name` in their own registry, so their
    /// priorities only order them relative to each other.
    pub fn not_null(name: impl Into<String>, message: impl Into<String>, registry: Registry) -> Self {
        let name = name.into();
        Self::new(
            name.clone(),
            NotNull::with_message(message),
            Orchestrator::new(registry),
            name,
        )
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }
}

impl ValidationUnit for NestedUnit {
    fn evaluate(&self, input: &Value) -> UnitResult {
        let gate_messages = self.gate.evaluate(input)?;
        if !gate_messages.is_empty() {
            tracing::trace!(unit = %self.name, "gate failed, skipping nested run");
            return Ok(gate_messages);
        }

        let report = self.inner.run(&self.inner_tag, input).map_err(|error| {
            let source = error.unit_error();
            let mut preceding = failure_messages(error.findings());
            preceding.extend_from_slice(source.preceding());
            UnitError::Nested {
                unit: self.name.clone(),
                inner: source.unit().to_string(),
                message: source.to_string(),
                preceding,
            }
        })?;

        // A recording run halts on its first execution error, so it is the last finding
        if let Some(error) = report.execution_errors().next() {
            return Err(UnitError::Nested {
                unit: self.name.clone(),
                inner: error.unit.clone(),
                message: error.message.clone(),
                preceding: failure_messages(&report.findings),
            });
        }

        Ok(report.findings.into_iter().map(|finding| finding.message).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn stop_on_error(&self) -> bool {
        self.stop_on_error
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "gate": self.gate.name(),
            "inner_tag": self.inner_tag,
            "inner_units": self
                .inner
                .registry()
                .units_for(&self.inner_tag)
                .iter()
                .map(|unit| unit.name())
                .collect::<Vec<_>>(),
        }))
    }
}

fn failure_messages(findings: &[Finding]) -> Vec<String> {
    findings
        .iter()
        .filter(|finding| finding.is_failure())
        .map(|finding| finding.message.clone())
        .collect()
}
