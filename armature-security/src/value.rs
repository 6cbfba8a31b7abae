// Recursive traversal of filtered values

use crate::error::Result;
use serde_json::{Map, Value};

/// Apply `f` to every scalar leaf, preserving container shape, order and keys.
pub fn map_scalars<F>(value: Value, f: &mut F) -> Result<Value>
where
    F: FnMut(Value) -> Result<Value>,
{
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(map_scalars(item, f)?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (key, item) in entries {
                out.insert(key, map_scalars(item, f)?);
            }
            Ok(Value::Object(out))
        }
        scalar => f(scalar),
    }
}

/// Apply `f` to every string leaf; other scalars pass through untouched.
pub fn map_strings<F>(value: Value, mut f: F) -> Result<Value>
where
    F: FnMut(&str) -> Result<String>,
{
    map_scalars(value, &mut |scalar| match scalar {
        Value::String(s) => f(&s).map(Value::String),
        other => Ok(other),
    })
}

/// Text form of a value: null and `false` are empty, `true` is `"1"`,
/// numbers are decimal and containers are compact JSON.
pub fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => n.to_string(),
        container => container.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_strings_preserves_shape() {
        let input = json!({ "b": ["x", 1, null], "a": { "c": "y" } });
        let output = map_strings(input, |s| Ok(s.to_uppercase())).unwrap();

        assert_eq!(output, json!({ "b": ["X", 1, null], "a": { "c": "Y" } }));
        let keys: Vec<_> = output.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_error_stops_traversal() {
        let mut seen = 0;
        let result = map_strings(json!(["a", "b", "c"]), |s| {
            seen += 1;
            if s == "b" {
                Err(crate::SecurityError::filter_failed("test", "boom"))
            } else {
                Ok(s.to_string())
            }
        });

        assert!(result.is_err());
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_into_text() {
        assert_eq!(into_text(json!("s")), "s");
        assert_eq!(into_text(json!(null)), "");
        assert_eq!(into_text(json!(true)), "1");
        assert_eq!(into_text(json!(false)), "");
        assert_eq!(into_text(json!(42)), "42");
        assert_eq!(into_text(json!([1])), "[1]");
    }
}
