//! Type tags and the two classifiers.
//!
//! - `classify` looks at the runtime shape of an argument.
//! - `classify_config` looks at a registration-time descriptor (a named type
//!   identity, null/undefined, or the NaN / Infinity sentinels).
//!
//! Both agree on tag numbering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The built-in kinds a runtime value can be classified as.
///
/// Extension types are not tags: they are predicates, see `crate::registry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TypeTag {
    Null = 0,
    Undefined = 1,
    Infinity = 2,
    Date = 3,
    NaN = 4,
    Number = 5,
    String = 6,
    Object = 7,
    Array = 8,
    RegExp = 9,
    Boolean = 10,
    Function = 11,
    Element = 12,
}

impl TypeTag {
    pub const ALL: [TypeTag; 13] = [
        TypeTag::Null,
        TypeTag::Undefined,
        TypeTag::Infinity,
        TypeTag::Date,
        TypeTag::NaN,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::RegExp,
        TypeTag::Boolean,
        TypeTag::Function,
        TypeTag::Element,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "Null",
            TypeTag::Undefined => "Undefined",
            TypeTag::Infinity => "Infinity",
            TypeTag::Date => "Date",
            TypeTag::NaN => "NaN",
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
            TypeTag::RegExp => "RegExp",
            TypeTag::Boolean => "Boolean",
            TypeTag::Function => "Function",
            TypeTag::Element => "Element",
        }
    }

    /// Name lookup for built-in type identities. Case-sensitive, like the
    /// global constructor names it mirrors.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        TypeTag::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a built-in type name")]
pub struct ParseTagError(pub String);

impl FromStr for TypeTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::from_name(s).ok_or_else(|| ParseTagError(s.to_string()))
    }
}

/// Classify a runtime value.
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::Null,
        Value::Undefined => TypeTag::Undefined,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Element(_) => TypeTag::Element,
        Value::Number(n) if n.is_nan() => TypeTag::NaN,
        Value::Number(n) if !n.is_finite() => TypeTag::Infinity,
        Value::Number(_) => TypeTag::Number,
        Value::String(_) => TypeTag::String,
        Value::Function(_) => TypeTag::Function,
        Value::Array(_) => TypeTag::Array,
        Value::RegExp(_) => TypeTag::RegExp,
        Value::Date(_) => TypeTag::Date,
        Value::Object(_) => TypeTag::Object,
    }
}

/// Classify a registration-time type descriptor.
///
/// Named type identities (functions named after a built-in tag) resolve by
/// name. Anything else that is not a valid number stands for NaN, and a valid
/// number stands for Infinity.
pub fn classify_config(descriptor: &Value) -> TypeTag {
    match descriptor {
        Value::Null => TypeTag::Null,
        Value::Undefined => TypeTag::Undefined,
        Value::Function(f) => f
            .name()
            .and_then(TypeTag::from_name)
            .unwrap_or(TypeTag::NaN),
        Value::Number(n) if !n.is_nan() => TypeTag::Infinity,
        _ => TypeTag::NaN,
    }
}

/// Classify every argument of a call.
pub fn classify_all(args: &[Value]) -> Vec<TypeTag> {
    args.iter().map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Element, Function, RegExp};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn noop() -> Value {
        Value::Function(Function::new(0, |_, _| Ok(Value::Undefined)))
    }

    #[rstest]
    #[case::null(Value::Null, TypeTag::Null)]
    #[case::undefined(Value::Undefined, TypeTag::Undefined)]
    #[case::infinity(Value::from(f64::INFINITY), TypeTag::Infinity)]
    #[case::negative_infinity(Value::from(f64::NEG_INFINITY), TypeTag::Infinity)]
    #[case::date(Value::from(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()), TypeTag::Date)]
    #[case::nan(Value::from(f64::NAN), TypeTag::NaN)]
    #[case::number(Value::from(0), TypeTag::Number)]
    #[case::string(Value::from(""), TypeTag::String)]
    #[case::object(Value::object([("a", 1)]), TypeTag::Object)]
    #[case::array(Value::Array(vec![]), TypeTag::Array)]
    #[case::regexp(Value::RegExp(RegExp::new("-", "gi")), TypeTag::RegExp)]
    #[case::boolean(Value::from(false), TypeTag::Boolean)]
    #[case::function(noop(), TypeTag::Function)]
    #[case::element(Value::Element(Element::new("body")), TypeTag::Element)]
    fn classifies_canonical_values(#[case] value: Value, #[case] expected: TypeTag) {
        assert_eq!(classify(&value), expected);
    }

    #[rstest]
    #[case::null(Value::Null, TypeTag::Null)]
    #[case::undefined(Value::Undefined, TypeTag::Undefined)]
    #[case::nan(Value::from(f64::NAN), TypeTag::NaN)]
    #[case::infinity(Value::from(f64::INFINITY), TypeTag::Infinity)]
    #[case::named_date(Value::Function(Function::named("Date", 0, |_, _| Ok(Value::Undefined))), TypeTag::Date)]
    #[case::named_element(Value::Function(Function::named("Element", 0, |_, _| Ok(Value::Undefined))), TypeTag::Element)]
    #[case::unnamed_function(noop(), TypeTag::NaN)]
    #[case::string(Value::from("Number"), TypeTag::NaN)]
    fn classifies_descriptors(#[case] descriptor: Value, #[case] expected: TypeTag) {
        assert_eq!(classify_config(&descriptor), expected);
    }

    #[test]
    fn tag_numbering_is_stable() {
        for (i, tag) in TypeTag::ALL.iter().enumerate() {
            assert_eq!(*tag as usize, i);
        }
    }

    #[test]
    fn names_round_trip() {
        for tag in TypeTag::ALL {
            assert_eq!(tag.name().parse::<TypeTag>(), Ok(tag));
        }
        assert_eq!(
            "number".parse::<TypeTag>(),
            Err(ParseTagError("number".to_string()))
        );
    }
}
