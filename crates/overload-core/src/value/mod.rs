//! Value model: the dynamic values a dispatcher classifies and forwards.
//!
//! Implementations always receive the original `Value`s, never their tags.

pub mod function;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use self::function::Function;

/// A pattern object (source + flags). Matching is not performed here, the
/// dispatcher only needs to tell patterns apart from other values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegExp {
    pub source: String,
    pub flags: String,
}

impl RegExp {
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

/// A UI element node (tag name + attributes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// A dynamically typed runtime value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Date(DateTime<Utc>),
    RegExp(RegExp),
    Function(Function),
    Element(Element),
}

impl Value {
    /// Build an object from `(key, value)` pairs.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Boolean coercion: `false`, `0`, `-0`, NaN, `""`, null and undefined
    /// are falsy, everything else (including empty arrays/objects) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Property lookup on an object. Anything that is not an object has no
    /// properties here.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// JSON view of the value. Values JSON cannot express (undefined,
    /// non-finite numbers, functions) become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Date(d) => Json::String(d.to_rfc3339()),
            Value::RegExp(re) => Json::String(re.to_string()),
            Value::Element(el) => serde_json::to_value(el).unwrap_or(Json::Null),
        }
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => write!(f, "[{}]", display_args(items)),
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::RegExp(re) => write!(f, "{re}"),
            Value::Function(func) => write!(f, "{func}"),
            Value::Element(el) => write!(f, "<{}>", el.tag_name),
        }
    }
}

/// Comma-separated display of an argument list.
pub fn display_args(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<RegExp> for Value {
    fn from(re: RegExp) -> Self {
        Value::RegExp(re)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Element> for Value {
    fn from(el: Element) -> Self {
        Value::Element(el)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::undefined(Value::Undefined, false)]
    #[case::null(Value::Null, false)]
    #[case::false_(Value::from(false), false)]
    #[case::zero(Value::from(0), false)]
    #[case::negative_zero(Value::from(-0.0), false)]
    #[case::nan(Value::from(f64::NAN), false)]
    #[case::empty_string(Value::from(""), false)]
    #[case::true_(Value::from(true), true)]
    #[case::one(Value::from(1), true)]
    #[case::string(Value::from("1"), true)]
    #[case::empty_object(Value::object(Vec::<(String, Value)>::new()), true)]
    #[case::empty_array(Value::Array(vec![]), true)]
    fn truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn from_json_maps_structures() {
        let v = Value::from(json!({ "foo": "", "bar": [1, null, true] }));
        assert_eq!(v.get("foo"), Some(&Value::from("")));
        assert_eq!(
            v.get("bar"),
            Some(&Value::Array(vec![Value::from(1), Value::Null, Value::from(true)]))
        );
        assert_eq!(v.get("missing"), None);
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        let nan = Value::from(f64::NAN);
        assert_ne!(nan, nan.clone());
    }

    #[test]
    fn to_json_drops_unrepresentable_values() {
        let v = Value::Array(vec![
            Value::Undefined,
            Value::from(f64::INFINITY),
            Value::from(1.5),
            Value::RegExp(RegExp::new("-", "gi")),
        ]);
        assert_eq!(v.to_json(), json!([null, null, 1.5, "/-/gi"]));
    }

    #[test]
    fn display_is_readable() {
        let v = Value::object([("a", Value::from(5)), ("b", Value::from("x"))]);
        assert_eq!(v.to_string(), "{a: 5, b: \"x\"}");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Element(Element::new("body")).to_string(), "<body>");
    }
}
