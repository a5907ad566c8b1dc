use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeMap, SerializeSeq};

/// A value flowing into, or out of, a model field.
///
/// Everything an LLM produces starts life as [`FieldValue::String`]; the
/// other variants are what the literal parser can turn such a string into.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<FieldValue>),
    Tuple(Vec<FieldValue>),
    /// Members are unique, kept in first-seen order.
    Set(Vec<FieldValue>),
    /// Keys are unique, kept in first-seen order; values are last-write-wins.
    Map(Vec<(FieldValue, FieldValue)>),
}

impl serde::Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::List(items) | FieldValue::Tuple(items) | FieldValue::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            // JSON keys are strings, so other keys are written in literal
            // syntax. `1` and `'1'` are distinct keys here but both render as
            // "1"; a JSON value built from this keeps the later entry.
            FieldValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    match k {
                        FieldValue::String(s) => map.serialize_entry(s, v)?,
                        other => map.serialize_entry(&other.to_string(), v)?,
                    }
                }
                map.end()
            }
        }
    }
}

impl FieldValue {
    pub fn r#type(&self) -> String {
        match self {
            FieldValue::String(_) => "string".into(),
            FieldValue::Int(_) => "int".into(),
            FieldValue::Float(_) => "float".into(),
            FieldValue::Bool(_) => "bool".into(),
            FieldValue::Null => "null".into(),
            FieldValue::List(items) => format!("list<{}>", Self::member_types(items.iter())),
            FieldValue::Tuple(items) => format!(
                "({})",
                items
                    .iter()
                    .map(|v| v.r#type())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            FieldValue::Set(items) => format!("set<{}>", Self::member_types(items.iter())),
            FieldValue::Map(entries) => format!(
                "map<{}, {}>",
                Self::member_types(entries.iter().map(|(k, _)| k)),
                Self::member_types(entries.iter().map(|(_, v)| v))
            ),
        }
    }

    fn member_types<'a>(items: impl Iterator<Item = &'a FieldValue>) -> String {
        let mut types: Vec<String> = vec![];
        for t in items.map(|v| v.r#type()) {
            if !types.contains(&t) {
                types.push(t);
            }
        }
        if types.is_empty() {
            "?".into()
        } else {
            types.join(" | ")
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Looks up a string key in a map value.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Builds a set, dropping repeated members.
    pub fn set_of(items: impl IntoIterator<Item = FieldValue>) -> FieldValue {
        let members: IndexSet<HashKey> = items.into_iter().map(HashKey).collect();
        FieldValue::Set(members.into_iter().map(|k| k.0).collect())
    }

    /// Builds a map; a repeated key keeps its first position and takes the
    /// last value.
    pub fn map_of(entries: impl IntoIterator<Item = (FieldValue, FieldValue)>) -> FieldValue {
        let out: IndexMap<HashKey, FieldValue> =
            entries.into_iter().map(|(k, v)| (HashKey(k), v)).collect();
        FieldValue::Map(out.into_iter().map(|(k, v)| (k.0, v)).collect())
    }
}

/// Hashable view of a value used to dedup set members and dict keys.
///
/// Equality is `FieldValue` equality, so `1`, `1.0` and `True` stay distinct.
struct HashKey(FieldValue);

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

fn hash_value<H: Hasher>(value: &FieldValue, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        FieldValue::String(s) => s.hash(state),
        FieldValue::Int(i) => i.hash(state),
        // -0.0 == 0.0, so both must hash alike.
        FieldValue::Float(f) if *f == 0.0 => 0u64.hash(state),
        FieldValue::Float(f) => f.to_bits().hash(state),
        FieldValue::Bool(b) => b.hash(state),
        FieldValue::Null => {}
        FieldValue::List(items) | FieldValue::Tuple(items) | FieldValue::Set(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        FieldValue::Map(entries) => {
            entries.len().hash(state);
            for (k, v) in entries {
                hash_value(k, state);
                hash_value(v, state);
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(entries) => FieldValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (FieldValue::String(k), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Renders the value in the same literal syntax the parser accepts.
impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(f: &mut std::fmt::Formatter<'_>, items: &[FieldValue]) -> std::fmt::Result {
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            Ok(())
        }

        match self {
            FieldValue::String(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    match c {
                        '\'' => write!(f, "\\'")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\r' => write!(f, "\\r")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "'")
            }
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{:?}", v),
            FieldValue::Bool(true) => write!(f, "True"),
            FieldValue::Bool(false) => write!(f, "False"),
            FieldValue::Null => write!(f, "None"),
            FieldValue::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            FieldValue::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            FieldValue::Set(items) if items.is_empty() => write!(f, "set()"),
            FieldValue::Set(items) => {
                write!(f, "{{")?;
                join(f, items)?;
                write!(f, "}}")
            }
            FieldValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_literal_syntax() {
        let value = FieldValue::map_of(vec![
            (
                FieldValue::from("a"),
                FieldValue::List(vec![FieldValue::Int(1), FieldValue::Float(2.0)]),
            ),
            (FieldValue::Int(3), FieldValue::Tuple(vec![FieldValue::Null])),
            (FieldValue::Bool(true), FieldValue::set_of(vec![])),
        ]);
        assert_eq!(value.to_string(), "{'a': [1, 2.0], 3: (None,), True: set()}");
    }

    #[test]
    fn test_map_of_keeps_first_position_last_value() {
        let value = FieldValue::map_of(vec![
            (FieldValue::from("a"), FieldValue::Int(1)),
            (FieldValue::from("b"), FieldValue::Int(2)),
            (FieldValue::from("a"), FieldValue::Int(3)),
        ]);
        assert_eq!(
            value,
            FieldValue::Map(vec![
                (FieldValue::from("a"), FieldValue::Int(3)),
                (FieldValue::from("b"), FieldValue::Int(2)),
            ])
        );
        assert_eq!(value.get("a"), Some(&FieldValue::Int(3)));
    }

    #[test]
    fn test_serialize_non_string_keys() {
        let value = FieldValue::map_of(vec![
            (FieldValue::Int(1), FieldValue::from("one")),
            (FieldValue::from("two"), FieldValue::set_of(vec![FieldValue::Int(2), FieldValue::Int(2)])),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!({"1": "one", "two": [2]})
        );
    }

    #[test]
    fn test_colliding_json_keys_keep_later_entry() {
        let value = FieldValue::map_of(vec![
            (FieldValue::Int(1), FieldValue::from("a")),
            (FieldValue::from("1"), FieldValue::from("b")),
        ]);
        let FieldValue::Map(entries) = &value else {
            panic!("Expected map");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!({"1": "b"})
        );
    }

    #[test]
    fn test_numeric_kinds_stay_distinct() {
        let value = FieldValue::set_of(vec![
            FieldValue::Int(1),
            FieldValue::Float(1.0),
            FieldValue::Bool(true),
            FieldValue::Int(1),
            FieldValue::Float(0.0),
            FieldValue::Float(-0.0),
        ]);
        assert_eq!(
            value,
            FieldValue::Set(vec![
                FieldValue::Int(1),
                FieldValue::Float(1.0),
                FieldValue::Bool(true),
                FieldValue::Float(0.0),
            ])
        );
    }

    #[test]
    fn test_dedup_scales_linearly() {
        let n = 50_000;
        let start = std::time::Instant::now();
        let set = FieldValue::set_of((0..n).chain(0..n).map(FieldValue::Int));
        let map = FieldValue::map_of((0..n).map(|i| {
            let key = FieldValue::Tuple(vec![FieldValue::Int(i % 1000), FieldValue::Int(i)]);
            (key, FieldValue::Int(i))
        }));
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert!(matches!(set, FieldValue::Set(ref m) if m.len() == n as usize));
        assert!(matches!(map, FieldValue::Map(ref m) if m.len() == n as usize));
    }

    #[test]
    fn test_type_names() {
        let value = FieldValue::List(vec![
            FieldValue::Int(1),
            FieldValue::from("x"),
            FieldValue::Int(2),
        ]);
        assert_eq!(value.r#type(), "list<int | string>");
        assert_eq!(FieldValue::List(vec![]).r#type(), "list<?>");
    }

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(serde_json::json!({"n": 3, "f": 0.5, "ok": true, "x": null}));
        assert_eq!(value.get("n").and_then(FieldValue::as_int), Some(3));
        assert_eq!(value.get("f"), Some(&FieldValue::Float(0.5)));
        assert_eq!(value.get("ok").and_then(FieldValue::as_bool), Some(true));
        assert!(value.get("x").is_some_and(FieldValue::is_null));
        assert_eq!(value.get("missing"), None);
    }
}
