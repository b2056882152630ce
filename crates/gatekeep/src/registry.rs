//! Unit registry keyed by input tag

use crate::error::RegistryError;
use crate::traits::ValidationUnit;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

type SortedUnits = BTreeMap<String, Arc<[Arc<dyn ValidationUnit>]>>;

/// Collection of validation units per input tag.
///
/// Units are registered during setup. The first read sorts every tag by
/// ascending priority (stable, so equal priorities keep registration order)
/// and seals the registry; later registrations fail with [`RegistryError::Sealed`].
pub struct Registry {
    /// Units in registration order
    entries: BTreeMap<String, Vec<Arc<dyn ValidationUnit>>>,
    /// Sorted view, populated on first read
    sealed: OnceLock<SortedUnits>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tags", &self.entries.keys().collect::<Vec<_>>())
            .field("unit_count", &self.unit_count())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            sealed: OnceLock::new(),
        }
    }

    /// Register a unit for an input tag.
    ///
    /// Units are told apart by [`ValidationUnit::name`]. Built-in units share
    /// one name per kind (`"length"`, `"pattern"`, ...), so registering two of
    /// a kind under one tag needs [`UnitExt::named`](crate::units::UnitExt::named)
    /// on at least one of them, otherwise [`RegistryError::DuplicateUnit`] is returned.
    pub fn register<U>(&mut self, tag: impl Into<String>, unit: U) -> Result<(), RegistryError>
    where
        U: ValidationUnit + 'static,
    {
        self.register_shared(tag, Arc::new(unit))
    }

    /// Register a unit that is already shared, e.g. one used under several tags
    pub fn register_shared(
        &mut self,
        tag: impl Into<String>,
        unit: Arc<dyn ValidationUnit>,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();

        if self.is_sealed() {
            return Err(RegistryError::Sealed {
                tag,
                unit: unit.name().to_string(),
            });
        }

        let units = self.entries.entry(tag.clone()).or_default();
        if units.iter().any(|existing| existing.name() == unit.name()) {
            return Err(RegistryError::DuplicateUnit {
                tag,
                unit: unit.name().to_string(),
            });
        }

        tracing::trace!(
            tag = %tag,
            unit = unit.name(),
            priority = unit.priority(),
            "registered validation unit"
        );
        units.push(unit);
        Ok(())
    }

    /// Builder-style registration
    pub fn with<U>(mut self, tag: impl Into<String>, unit: U) -> Result<Self, RegistryError>
    where
        U: ValidationUnit + 'static,
    {
        self.register(tag, unit)?;
        Ok(self)
    }

    /// Units for a tag in execution order. Unknown tags have no units.
    ///
    /// Seals the registry.
    pub fn units_for(&self, tag: &str) -> &[Arc<dyn ValidationUnit>] {
        self.sorted().get(tag).map(|units| &**units).unwrap_or(&[])
    }

    /// All tags with at least one unit, in sorted order. Seals the registry.
    pub fn tags(&self) -> Vec<&str> {
        self.sorted().keys().map(String::as_str).collect()
    }

    /// Seal the registry without reading from it
    pub fn seal(&self) {
        self.sorted();
    }

    /// Whether the registry has been read from
    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    /// Check if there are any units registered
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Total number of registered units across all tags
    pub fn unit_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Execution order per tag as JSON. Seals the registry.
    pub fn describe(&self) -> Value {
        let tags: serde_json::Map<String, Value> = self
            .sorted()
            .iter()
            .map(|(tag, units)| {
                let units: Vec<Value> = units
                    .iter()
                    .map(|unit| {
                        json!({
                            "name": unit.name(),
                            "priority": unit.priority(),
                            "stop_on_error": unit.stop_on_error(),
                            "parameters": unit.parameters(),
                        })
                    })
                    .collect();
                (tag.clone(), Value::Array(units))
            })
            .collect();

        Value::Object(tags)
    }

    fn sorted(&self) -> &SortedUnits {
        self.sealed.get_or_init(|| {
            let sorted: SortedUnits = self
                .entries
                .iter()
                .map(|(tag, units)| {
                    let mut ordered = units.clone();
                    // stable: equal priorities keep registration order
                    ordered.sort_by_key(|unit| unit.priority());
                    (tag.clone(), ordered.into())
                })
                .collect();

            tracing::info!(
                tags = sorted.len(),
                units = self.unit_count(),
                "validation registry sealed"
            );
            sorted
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitResult;

    struct Named {
        name: &'static str,
        priority: i32,
    }

    impl ValidationUnit for Named {
        fn evaluate(&self, _input: &Value) -> UnitResult {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn names(units: &[Arc<dyn ValidationUnit>]) -> Vec<&str> {
        units.iter().map(|u| u.name()).collect()
    }

    #[test]
    fn test_units_sorted_by_ascending_priority() {
        let mut registry = Registry::new();
        registry.register("username", Named { name: "c", priority: 3 }).unwrap();
        registry.register("username", Named { name: "a", priority: 1 }).unwrap();
        registry.register("username", Named { name: "b", priority: 2 }).unwrap();

        assert_eq!(names(registry.units_for("username")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = Registry::new();
        registry.register("tag", Named { name: "first", priority: 5 }).unwrap();
        registry.register("tag", Named { name: "early", priority: -1 }).unwrap();
        registry.register("tag", Named { name: "second", priority: 5 }).unwrap();
        registry.register("tag", Named { name: "third", priority: 5 }).unwrap();

        assert_eq!(
            names(registry.units_for("tag")),
            vec!["early", "first", "second", "third"]
        );
    }

    #[test]
    fn test_registration_after_read_is_rejected() {
        let mut registry = Registry::new();
        registry.register("tag", Named { name: "a", priority: 0 }).unwrap();
        assert!(!registry.is_sealed());

        let _ = registry.units_for("tag");
        assert!(registry.is_sealed());

        let result = registry.register("tag", Named { name: "b", priority: 0 });
        assert_eq!(
            result,
            Err(RegistryError::Sealed {
                tag: "tag".to_string(),
                unit: "b".to_string(),
            })
        );
        assert_eq!(registry.unit_count(), 1);
    }

    #[test]
    fn test_explicit_seal() {
        let mut registry = Registry::new();
        registry.seal();
        assert!(registry.register("tag", Named { name: "a", priority: 0 }).is_err());
    }

    #[test]
    fn test_duplicate_name_under_same_tag_is_rejected() {
        let mut registry = Registry::new();
        registry.register("email", Named { name: "not_null", priority: 0 }).unwrap();

        let result = registry.register("email", Named { name: "not_null", priority: 1 });
        assert!(matches!(result, Err(RegistryError::DuplicateUnit { .. })));

        // The same name under a different tag is fine
        registry.register("username", Named { name: "not_null", priority: 0 }).unwrap();
        assert_eq!(registry.unit_count(), 2);
    }

    #[test]
    fn test_unknown_tag_has_no_units() {
        let registry = Registry::new();
        assert!(registry.units_for("missing").is_empty());
        assert!(registry.tags().is_empty());
    }

    #[test]
    fn test_describe_lists_sealed_order() {
        let registry = Registry::new()
            .with("tag", Named { name: "late", priority: 9 })
            .unwrap()
            .with("tag", Named { name: "soon", priority: 1 })
            .unwrap();

        let description = registry.describe();
        assert_eq!(description["tag"][0]["name"], "soon");
        assert_eq!(description["tag"][1]["name"], "late");
        assert_eq!(description["tag"][1]["priority"], 9);
    }
}
