//! The Whatalang runtime value tree.
//!
//! Everything a program can compute or store is a [`Value`]. Values are
//! always owned: map/filter/reduce results and anything read out of the
//! state tree are fresh allocations, never aliases into an ancestor.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A dynamically-typed Whatalang value.
///
/// Objects preserve key insertion order for printing; equality between
/// objects is order-independent (an `IndexMap` compares by contents).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    /// The variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Truthiness for `filter` predicates and `and`/`or`.
    ///
    /// `null` and `false` are falsy, as are `0` and the empty string.
    /// Arrays and objects are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// Canonical print formatting.
///
/// Strings render unquoted as-is, numbers without unnecessary trailing
/// zeros, booleans as `true`/`false`, `null` literally. Arrays render as
/// `[v1, v2]` and objects as `{key: v}` in insertion order, each element
/// rendered recursively by the same rule.
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, *n),
        Value::Str(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, val)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_value(out, val);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: f64) {
    use fmt::Write;
    // Integral doubles print without a decimal point: 10, not 10.0.
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        let _ = write!(out, "{}", n as i64);
    } else {
        let _ = write!(out, "{n}");
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

/// Serializes as natural JSON (objects keep insertion order).
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, val) in fields {
                    map.serialize_entry(key, val)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    #[test]
    fn test_render_scalars() {
        assert_eq!(render(&Value::Null), "null");
        assert_eq!(render(&Value::Bool(true)), "true");
        assert_eq!(render(&Value::Bool(false)), "false");
        assert_eq!(render(&Value::Str("hello".into())), "hello");
    }

    #[test]
    fn test_render_numbers_without_trailing_zeros() {
        assert_eq!(render(&Value::Number(10.0)), "10");
        assert_eq!(render(&Value::Number(-3.0)), "-3");
        assert_eq!(render(&Value::Number(0.0)), "0");
        assert_eq!(render(&Value::Number(3.14)), "3.14");
        assert_eq!(render(&Value::Number(0.5)), "0.5");
    }

    #[test]
    fn test_render_array() {
        let v = Value::Array(vec![
            Value::Number(1.0),
            Value::Str("a".into()),
            Value::Array(vec![Value::Bool(true)]),
        ]);
        assert_eq!(render(&v), "[1, a, [true]]");
    }

    #[test]
    fn test_render_object_insertion_order() {
        let v = Value::Object(indexmap! {
            "zeta".to_string() => Value::Number(1.0),
            "alpha".to_string() => Value::Null,
        });
        assert_eq!(render(&v), "{zeta: 1, alpha: null}");
    }

    #[test]
    fn test_object_equality_ignores_order() {
        let a = Value::Object(indexmap! {
            "x".to_string() => Value::Number(1.0),
            "y".to_string() => Value::Number(2.0),
        });
        let b = Value::Object(indexmap! {
            "y".to_string() => Value::Number(2.0),
            "x".to_string() => Value::Number(1.0),
        });
        assert_eq!(a, b);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(Value::Str("x".into()).is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(IndexMap::new()).is_truthy());
    }

    #[test]
    fn test_json_serialization_keeps_insertion_order() {
        let v = Value::Object(indexmap! {
            "b".to_string() => Value::Number(2.0),
            "a".to_string() => Value::Array(vec![Value::Null, Value::Bool(true)]),
        });
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"b":2.0,"a":[null,true]}"#);
    }
}
