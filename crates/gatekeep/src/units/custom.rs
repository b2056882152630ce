//! Closure-backed units

use crate::error::UnitResult;
use crate::traits::ValidationUnit;
use serde_json::Value;
use std::sync::Arc;

/// Type alias for unit evaluation functions
pub type EvaluateFn = Arc<dyn Fn(&Value) -> UnitResult + Send + Sync>;

/// Unit defined by a user-supplied function
#[derive(Clone)]
pub struct CustomUnit {
    /// Name/identifier for this unit
    pub name: String,
    evaluate: EvaluateFn,
}

impl CustomUnit {
    /// Create a unit from a function returning the failure messages
    pub fn new<F>(name: impl Into<String>, evaluate: F) -> Self
    where
        F: Fn(&Value) -> UnitResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            evaluate: Arc::new(evaluate),
        }
    }

    /// Create a unit that fails with `message` when `predicate` is false
    pub fn check<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(name, move |value| {
            if predicate(value) {
                Ok(Vec::new())
            } else {
                Ok(vec![message.clone()])
            }
        })
    }

    /// Create a unit that accepts only the listed strings
    pub fn one_of(name: impl Into<String>, allowed_values: Vec<String>) -> Self {
        Self::new(name, move |value| match value {
            Value::Null => Ok(Vec::new()),
            Value::String(s) if allowed_values.contains(s) => Ok(Vec::new()),
            Value::String(_) => Ok(vec![format!(
                "must be one of: {}",
                allowed_values.join(", ")
            )]),
            _ => Ok(vec!["must be a string".to_string()]),
        })
    }
}

impl std::fmt::Debug for CustomUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomUnit")
            .field("name", &self.name)
            .finish()
    }
}

impl ValidationUnit for CustomUnit {
    fn evaluate(&self, input: &Value) -> UnitResult {
        (self.evaluate)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({ "name": self.name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;
    use serde_json::json;

    #[test]
    fn test_check() {
        let unit = CustomUnit::check("even", "must be even", |value| {
            value.as_i64().is_some_and(|n| n % 2 == 0)
        });

        assert!(unit.evaluate(&json!(4)).unwrap().is_empty());
        assert_eq!(unit.evaluate(&json!(3)).unwrap(), vec!["must be even"]);
        assert_eq!(unit.name(), "even");
    }

    #[test]
    fn test_multiple_messages() {
        let unit = CustomUnit::new("multi", |_value| {
            Ok(vec!["first".to_string(), "second".to_string()])
        });
        assert_eq!(unit.evaluate(&json!(1)).unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_execution_error_passes_through() {
        let unit = CustomUnit::new("lookup", |_value| Err(UnitError::failed("lookup", "down")));
        assert!(unit.evaluate(&json!(1)).is_err());
    }

    #[test]
    fn test_one_of() {
        let unit = CustomUnit::one_of("status", vec!["active".to_string(), "inactive".to_string()]);
        assert!(unit.evaluate(&json!("active")).unwrap().is_empty());
        assert!(unit.evaluate(&Value::Null).unwrap().is_empty());
        assert_eq!(
            unit.evaluate(&json!("unknown")).unwrap(),
            vec!["must be one of: active, inactive"]
        );
        assert_eq!(unit.evaluate(&json!(1)).unwrap(), vec!["must be a string"]);
    }
}
