//! Change detection for audit records
//!
//! Computes the changed-key set between two filtered attribute maps and
//! projects both sides down to it. Also renders human-readable change
//! summaries for display.

use std::collections::BTreeSet;

use serde_json::Value;

use super::record::Attributes;

/// Keys whose values differ between `before` and `after`
///
/// A key present on only one side counts as changed.
pub fn changed_keys(before: &Attributes, after: &Attributes) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();

    for (key, before_val) in before {
        if after.get(key) != Some(before_val) {
            keys.insert(key.clone());
        }
    }

    for key in after.keys() {
        if !before.contains_key(key) {
            keys.insert(key.clone());
        }
    }

    keys
}

/// Restrict both maps to their changed keys
///
/// Returns `None` when nothing changed. Both returned maps carry the same
/// key set; a key missing on one side is recorded there as `null`.
pub fn project_changes(before: &Attributes, after: &Attributes) -> Option<(Attributes, Attributes)> {
    let keys = changed_keys(before, after);
    if keys.is_empty() {
        return None;
    }

    let pick = |source: &Attributes| -> Attributes {
        keys.iter()
            .map(|key| (key.clone(), source.get(key).cloned().unwrap_or(Value::Null)))
            .collect()
    };

    Some((pick(before), pick(after)))
}

/// Generate a human-readable diff between two attribute maps
///
/// Returns a string describing the changes in a user-friendly format.
/// Only includes top-level field changes for readability.
pub fn generate_diff(before: &Attributes, after: &Attributes) -> Option<String> {
    let mut changes = Vec::new();

    for (key, before_val) in before {
        if let Some(after_val) = after.get(key) {
            if before_val != after_val {
                changes.push(format!(
                    "{}: {} -> {}",
                    key,
                    format_value(before_val),
                    format_value(after_val)
                ));
            }
        } else {
            changes.push(format!(
                "{}: {} -> (removed)",
                key,
                format_value(before_val)
            ));
        }
    }

    for (key, after_val) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Format a JSON value for human-readable display
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Truncate long strings on a char boundary
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_single_field_change() {
        let before = attrs(json!({"name": "Acme Agency", "phone": "555-0100", "is_active": true}));
        let after = attrs(json!({"name": "Acme Agency", "phone": "555-0199", "is_active": true}));

        let keys = changed_keys(&before, &after);
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["phone"]);

        let (b, a) = project_changes(&before, &after).unwrap();
        assert_eq!(Value::Object(b), json!({"phone": "555-0100"}));
        assert_eq!(Value::Object(a), json!({"phone": "555-0199"}));
    }

    #[test]
    fn test_no_changes() {
        let before = attrs(json!({"name": "Test", "value": 100}));
        let after = attrs(json!({"value": 100, "name": "Test"}));

        assert!(changed_keys(&before, &after).is_empty());
        assert!(project_changes(&before, &after).is_none());
    }

    #[test]
    fn test_key_on_one_side_is_projected_as_null() {
        let before = attrs(json!({"name": "Test", "legacy": "x"}));
        let after = attrs(json!({"name": "Test", "room": "12B"}));

        let (b, a) = project_changes(&before, &after).unwrap();
        assert_eq!(Value::Object(b), json!({"legacy": "x", "room": null}));
        assert_eq!(Value::Object(a), json!({"legacy": null, "room": "12B"}));
    }

    #[test]
    fn test_projection_keeps_key_sets_equal() {
        let before = attrs(json!({"a": 1, "b": 2, "c": 3}));
        let after = attrs(json!({"a": 10, "b": 2, "d": 4}));

        let (b, a) = project_changes(&before, &after).unwrap();
        let bk: Vec<_> = b.keys().collect();
        let ak: Vec<_> = a.keys().collect();
        assert_eq!(bk, ak);
        assert_eq!(bk, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_changed_keys_is_deterministic() {
        let before = attrs(json!({"a": 1, "b": [1, 2], "c": {"x": 1}}));
        let after = attrs(json!({"a": 1, "b": [2, 1], "c": {"x": 2}}));

        let first = changed_keys(&before, &after);
        let second = changed_keys(&before, &after);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_generate_diff_text() {
        let before = attrs(json!({"name": "Old", "active": true, "legacy": 1}));
        let after = attrs(json!({"name": "New", "active": true, "room": "4"}));

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("name: \"Old\" -> \"New\""));
        assert!(diff.contains("legacy: 1 -> (removed)"));
        assert!(diff.contains("room: (added) -> \"4\""));
        assert!(!diff.contains("active"));
    }

    #[test]
    fn test_generate_diff_none_when_equal() {
        let same = attrs(json!({"name": "Same"}));
        assert!(generate_diff(&same, &same).is_none());
    }

    #[test]
    fn test_long_string_truncation() {
        let before = attrs(json!({"notes": "a".repeat(100)}));
        let after = attrs(json!({"notes": "short"}));

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!("test")), "\"test\"");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
