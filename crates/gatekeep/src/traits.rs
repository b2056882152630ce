//! Core unit trait for the gatekeep orchestrator

use crate::error::UnitResult;
use serde_json::Value;

/// Priority of a unit within its tag. Lower values run first.
pub type Priority = i32;

/// The atomic check every validator implements.
///
/// A unit is constructed once at setup and shared read-only between runs, so
/// it must be `Send + Sync` and must not mutate its input. `Value::Null` stands
/// for an absent input and has to be handled like any other value.
pub trait ValidationUnit: Send + Sync {
    /// Evaluate the input, returning the ordered failure messages.
    ///
    /// An empty vector means the check passed. Return `Err` only when the
    /// check could not be carried out at all. Blank messages are reported by
    /// the orchestrator as an execution error of the unit.
    fn evaluate(&self, input: &Value) -> UnitResult;

    /// Identifier used for duplicate detection and diagnostics
    fn name(&self) -> &str;

    /// Position of this unit in the run; ties keep registration order
    fn priority(&self) -> Priority {
        0
    }

    /// Halt the run after this unit fails
    fn stop_on_error(&self) -> bool {
        false
    }

    /// Unit configuration as JSON, for introspection
    fn parameters(&self) -> Option<Value> {
        None
    }
}

impl<U> ValidationUnit for Box<U>
where
    U: ValidationUnit + ?Sized,
{
    fn evaluate(&self, input: &Value) -> UnitResult {
        (**self).evaluate(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn priority(&self) -> Priority {
        (**self).priority()
    }

    fn stop_on_error(&self) -> bool {
        (**self).stop_on_error()
    }

    fn parameters(&self) -> Option<Value> {
        (**self).parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    impl ValidationUnit for AlwaysFails {
        fn evaluate(&self, _input: &Value) -> UnitResult {
            Ok(vec!["always fails".to_string()])
        }

        fn name(&self) -> &str {
            "always_fails"
        }
    }

    #[test]
    fn test_default_metadata() {
        let unit = AlwaysFails;
        assert_eq!(unit.priority(), 0);
        assert!(!unit.stop_on_error());
        assert!(unit.parameters().is_none());
    }

    #[test]
    fn test_boxed_unit_delegates() {
        let unit: Box<dyn ValidationUnit> = Box::new(AlwaysFails);
        assert_eq!(unit.name(), "always_fails");
        assert_eq!(unit.evaluate(&Value::Null).unwrap(), vec!["always fails"]);
    }
}
