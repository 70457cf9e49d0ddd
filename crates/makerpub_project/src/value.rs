//! Loose truthiness and display rules for metadata leaves.
//!
//! Metadata leaves are hand-edited YAML: a width may be `10`, `"10"`, `''`
//! or missing a value entirely. These helpers give all of them one
//! consistent meaning.

use serde_json::Value;

/// Null, `false`, zero, and empty strings/lists/maps are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a scalar the way an author wrote it (strings unquoted).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(10)));
        assert!(is_truthy(&json!("12")));
        assert!(is_truthy(&json!(["step"])));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("10")), "10");
        assert_eq!(display_value(&json!(10)), "10");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(null)), "");
    }
}
