//! Ordering and naming overrides for existing units

use crate::error::UnitResult;
use crate::traits::{Priority, ValidationUnit};
use serde_json::Value;

/// Wraps a unit, overriding its priority, stop behaviour or name.
///
/// Lets the same unit type be reused at different positions in different
/// tags without editing it.
#[derive(Debug, Clone)]
pub struct Prioritized<U> {
    inner: U,
    priority: Option<Priority>,
    stop_on_error: Option<bool>,
    name: Option<String>,
}

impl<U> Prioritized<U> {
    pub fn new(inner: U) -> Self {
        Self {
            inner,
            priority: None,
            stop_on_error: None,
            name: None,
        }
    }

    pub fn into_inner(self) -> U {
        self.inner
    }
}

impl<U: ValidationUnit> ValidationUnit for Prioritized<U> {
    fn evaluate(&self, input: &Value) -> UnitResult {
        self.inner.evaluate(input)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.inner.name())
    }

    fn priority(&self) -> Priority {
        self.priority.unwrap_or_else(|| self.inner.priority())
    }

    fn stop_on_error(&self) -> bool {
        self.stop_on_error
            .unwrap_or_else(|| self.inner.stop_on_error())
    }

    fn parameters(&self) -> Option<Value> {
        self.inner.parameters()
    }
}

/// Builder methods available on every unit
pub trait UnitExt: ValidationUnit + Sized {
    fn with_priority(self, priority: Priority) -> Prioritized<Self> {
        Prioritized::new(self).with_priority(priority)
    }

    fn stop_on_failure(self) -> Prioritized<Self> {
        Prioritized::new(self).stop_on_failure()
    }

    fn continue_on_failure(self) -> Prioritized<Self> {
        Prioritized::new(self).continue_on_failure()
    }

    fn named(self, name: impl Into<String>) -> Prioritized<Self> {
        Prioritized::new(self).named(name)
    }
}

impl<U: ValidationUnit> UnitExt for U {}

// Chaining on an existing wrapper updates it instead of nesting another.
impl<U> Prioritized<U> {
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn stop_on_failure(mut self) -> Self {
        self.stop_on_error = Some(true);
        self
    }

    pub fn continue_on_failure(mut self) -> Self {
        self.stop_on_error = Some(false);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Length, NotNull};

    #[test]
    fn test_overrides() {
        let unit = Length::new().max(3).with_priority(2).stop_on_failure().named("max_len");

        assert_eq!(unit.priority(), 2);
        assert!(unit.stop_on_error());
        assert_eq!(unit.name(), "max_len");
        assert_eq!(unit.evaluate(&serde_json::json!("abcd")).unwrap().len(), 1);
    }

    #[test]
    fn test_defaults_come_from_inner_unit() {
        let unit = Prioritized::new(NotNull::new());
        assert!(unit.stop_on_error());
        assert_eq!(unit.name(), "not_null");
        assert_eq!(unit.priority(), 0);

        let relaxed = NotNull::new().continue_on_failure();
        assert!(!relaxed.stop_on_error());
    }
}
