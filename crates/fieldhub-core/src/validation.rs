//! Rule-based validator that field handlers register rules on.
//!
//! Handlers add rules during `beforeValidate`; the host then runs the
//! validator over the submitted data. Failures are returned as
//! [`ValidationErrors`] data, never raised as errors.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule name reported when an empty value is rejected.
pub const EMPTY_RULE: &str = "_empty";

/// Predicate deciding whether a value satisfies a rule.
pub type RulePredicate = Box<dyn Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync>;

/// Data made available to rule predicates besides the value itself.
#[derive(Debug)]
pub struct RuleContext<'a> {
    /// Path of the field being validated.
    pub path: &'a str,
    /// Every submitted value, keyed by path.
    pub data: &'a IndexMap<String, Value>,
}

/// A named rule with its failure message.
pub struct ValidationRule {
    /// Rule name, e.g. `validateLen`.
    pub name: String,
    /// Message reported when the predicate fails.
    pub message: String,
    predicate: RulePredicate,
}

impl ValidationRule {
    /// Evaluates the rule against one value.
    pub fn check(&self, value: &Value, context: &RuleContext<'_>) -> bool {
        (self.predicate)(value, context)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("predicate", &"<closure>")
            .finish()
    }
}

#[derive(Debug, Clone)]
enum EmptyPolicy {
    Allow,
    Reject(String),
}

#[derive(Debug, Default)]
struct FieldRules {
    empty: Option<EmptyPolicy>,
    rules: Vec<ValidationRule>,
}

/// Collection of rules grouped by field path.
#[derive(Debug, Default)]
pub struct Validator {
    fields: IndexMap<String, FieldRules>,
}

impl Validator {
    /// Creates an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares whether an empty value is acceptable for `path`.
    ///
    /// When allowed, empty values skip every rule. When rejected, an empty
    /// value fails with `message` and no further rule runs.
    pub fn allow_empty(&mut self, path: &str, allow: bool, message: &str) -> &mut Self {
        let policy = if allow {
            EmptyPolicy::Allow
        } else {
            EmptyPolicy::Reject(message.to_string())
        };
        self.fields.entry(path.to_string()).or_default().empty = Some(policy);
        self
    }

    /// Appends a rule for `path`. Rules run in the order they were added.
    pub fn add<F>(&mut self, path: &str, name: &str, message: &str, predicate: F) -> &mut Self
    where
        F: Fn(&Value, &RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.fields
            .entry(path.to_string())
            .or_default()
            .rules
            .push(ValidationRule {
                name: name.to_string(),
                message: message.to_string(),
                predicate: Box::new(predicate),
            });
        self
    }

    /// Names of the rules registered for `path`, in evaluation order.
    pub fn rule_names(&self, path: &str) -> Vec<&str> {
        self.fields
            .get(path)
            .map(|f| f.rules.iter().map(|r| r.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Looks up a single rule so it can be evaluated on its own.
    pub fn rule(&self, path: &str, name: &str) -> Option<&ValidationRule> {
        self.fields
            .get(path)
            .and_then(|f| f.rules.iter().find(|r| r.name == name))
    }

    /// Returns `true` if any rule or empty policy exists for `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// Runs every registered rule over `data`.
    pub fn validate(&self, data: &IndexMap<String, Value>) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        for (path, field) in &self.fields {
            let value = data.get(path).cloned().unwrap_or(Value::Null);

            if is_empty(&value) {
                match &field.empty {
                    Some(EmptyPolicy::Reject(message)) => {
                        errors.push(path, EMPTY_RULE, message);
                        continue;
                    }
                    Some(EmptyPolicy::Allow) => continue,
                    None => {}
                }
            }

            let context = RuleContext { path, data };
            for rule in &field.rules {
                if !rule.check(&value, &context) {
                    errors.push(path, &rule.name, &rule.message);
                }
            }
        }

        errors
    }
}

/// Whether a submitted value counts as empty for the allow-empty policy.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Name of the failed rule.
    pub rule: String,
    /// User-facing message.
    pub message: String,
}

/// Failures grouped by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<ValidationFailure>>,
}

impl ValidationErrors {
    fn push(&mut self, path: &str, rule: &str, message: &str) {
        self.errors
            .entry(path.to_string())
            .or_default()
            .push(ValidationFailure {
                rule: rule.to_string(),
                message: message.to_string(),
            });
    }

    /// Returns `true` when validation passed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures for one path.
    pub fn for_path(&self, path: &str) -> &[ValidationFailure] {
        self.errors.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Messages for one path, in rule order.
    pub fn messages(&self, path: &str) -> Vec<&str> {
        self.for_path(path)
            .iter()
            .map(|f| f.message.as_str())
            .collect()
    }

    /// Iterates over `(path, failures)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationFailure])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(path: &str, value: Value) -> IndexMap<String, Value> {
        let mut map = IndexMap::new();
        map.insert(path.to_string(), value);
        map
    }

    #[test]
    fn test_rejected_empty_skips_rules() {
        let mut validator = Validator::new();
        validator
            .allow_empty(":title", false, "Field required.")
            .add(":title", "digits", "Digits only.", |v, _| {
                v.as_str().is_some_and(|s| s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty())
            });

        let errors = validator.validate(&data(":title", json!("")));
        assert_eq!(errors.messages(":title"), vec!["Field required."]);
        assert_eq!(errors.for_path(":title")[0].rule, EMPTY_RULE);
    }

    #[test]
    fn test_allowed_empty_passes() {
        let mut validator = Validator::new();
        validator
            .allow_empty(":title", true, "")
            .add(":title", "never", "Never valid.", |_, _| false);

        assert!(validator.validate(&data(":title", json!(""))).is_empty());
        assert!(validator.validate(&IndexMap::new()).is_empty());
        assert!(!validator.validate(&data(":title", json!("x"))).is_empty());
    }

    #[test]
    fn test_rules_run_in_order_and_collect() {
        let mut validator = Validator::new();
        validator
            .add(":t", "first", "First.", |_, _| false)
            .add(":t", "second", "Second.", |_, _| true)
            .add(":t", "third", "Third.", |_, _| false);

        assert_eq!(validator.rule_names(":t"), vec!["first", "second", "third"]);
        let errors = validator.validate(&data(":t", json!("v")));
        assert_eq!(errors.messages(":t"), vec!["First.", "Third."]);
    }

    #[test]
    fn test_rule_context_sees_other_values() {
        let mut validator = Validator::new();
        validator.add(":confirm", "matches", "Mismatch.", |v, ctx| {
            ctx.data.get(":password") == Some(v)
        });

        let mut submitted = data(":password", json!("s3cret"));
        submitted.insert(":confirm".to_string(), json!("s3cret"));
        assert!(validator.validate(&submitted).is_empty());

        submitted.insert(":confirm".to_string(), json!("other"));
        assert_eq!(validator.validate(&submitted).messages(":confirm"), vec!["Mismatch."]);
    }
}
