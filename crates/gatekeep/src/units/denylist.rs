//! Forbidden-word check backed by a swappable word list

use crate::error::UnitResult;
use crate::traits::ValidationUnit;
use arc_swap::ArcSwap;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

type Words = BTreeSet<String>;

/// Fails when a string input contains a denied word (case-insensitive).
///
/// The word list can be refreshed through a [`DenylistHandle`] while the unit
/// is registered. Each evaluation works on one snapshot of the list, so a
/// concurrent refresh is never observed half-applied.
#[derive(Debug, Clone)]
pub struct Denylist {
    words: Arc<ArcSwap<Words>>,
    /// Custom error message
    pub message: Option<String>,
}

/// Refreshes the words of a [`Denylist`] after registration
#[derive(Debug, Clone)]
pub struct DenylistHandle {
    words: Arc<ArcSwap<Words>>,
}

impl Denylist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: Arc::new(ArcSwap::from_pointee(normalize(words))),
            message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Handle for replacing the word list later
    pub fn handle(&self) -> DenylistHandle {
        DenylistHandle {
            words: Arc::clone(&self.words),
        }
    }
}

impl DenylistHandle {
    /// Atomically replace the word list
    pub fn replace<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = normalize(words);
        tracing::debug!(words = words.len(), "denylist refreshed");
        self.words.store(Arc::new(words));
    }

    pub fn len(&self) -> usize {
        self.words.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.load().is_empty()
    }
}

fn normalize<I, S>(words: I) -> Words
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|word| word.as_ref().trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

impl ValidationUnit for Denylist {
    fn evaluate(&self, input: &Value) -> UnitResult {
        let Some(text) = input.as_str() else {
            return Ok(Vec::new());
        };

        let words = self.words.load();
        let text = text.to_lowercase();

        // BTreeSet order keeps the reported word deterministic
        let Some(word) = words.iter().find(|word| text.contains(word.as_str())) else {
            return Ok(Vec::new());
        };

        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("contains forbidden word '{}'", word));
        Ok(vec![message])
    }

    fn name(&self) -> &str {
        "denylist"
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({
            "words": self.words.load().len(),
            "message": self.message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_words_case_insensitively() {
        let unit = Denylist::new(["Darn", "heck"]);
        assert_eq!(
            unit.evaluate(&json!("what the HECK")).unwrap(),
            vec!["contains forbidden word 'heck'"]
        );
        assert!(unit.evaluate(&json!("hello")).unwrap().is_empty());
    }

    #[test]
    fn test_reports_first_word_in_sorted_order() {
        let unit = Denylist::new(["zeta", "alpha"]);
        assert_eq!(
            unit.evaluate(&json!("zeta alpha")).unwrap(),
            vec!["contains forbidden word 'alpha'"]
        );
    }

    #[test]
    fn test_non_strings_pass() {
        let unit = Denylist::new(["x"]);
        assert!(unit.evaluate(&Value::Null).unwrap().is_empty());
        assert!(unit.evaluate(&json!(42)).unwrap().is_empty());
    }

    #[test]
    fn test_handle_replaces_words() {
        let unit = Denylist::new(["old"]).message("offensive");
        let handle = unit.handle();

        assert_eq!(unit.evaluate(&json!("old news")).unwrap(), vec!["offensive"]);

        handle.replace(["new", "  ", ""]);
        assert_eq!(handle.len(), 1);
        assert!(unit.evaluate(&json!("old news")).unwrap().is_empty());
        assert_eq!(unit.evaluate(&json!("brand new")).unwrap(), vec!["offensive"]);
    }
}
