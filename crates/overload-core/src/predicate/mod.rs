//! Predicate - 値に対する実行時チェック
//!
//! signature の各要素は `Param` で表現します。
//! - `Param::Tag`: classify の結果と完全一致
//! - `Param::Predicate`: 生の値に対してチェック関数を実行
//!
//! # 学習ポイント
//! - sum type による多相な signature 要素
//! - `Arc<dyn Fn>` で共有される不変なチェック関数

pub mod combinators;

use std::fmt;
use std::sync::Arc;

use crate::classify::{TypeTag, classify, classify_config};
use crate::value::Value;

pub use self::combinators::{any, except, falsy, shape, truthy, wild};

type Check = dyn Fn(&Value) -> bool + Send + Sync;

/// A named, immutable check over a raw value.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    check: Arc<Check>,
}

impl Predicate {
    pub fn new<F>(name: impl Into<Arc<str>>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// One element of a signature.
#[derive(Debug, Clone)]
pub enum Param {
    Tag(TypeTag),
    Predicate(Predicate),
}

impl Param {
    /// Does this element accept `value`, whose classified tag is `tag`?
    pub fn accepts(&self, value: &Value, tag: TypeTag) -> bool {
        match self {
            Param::Tag(expected) => *expected == tag,
            Param::Predicate(p) => p.check(value),
        }
    }

    /// Like `accepts`, classifying the value on demand.
    pub fn accepts_value(&self, value: &Value) -> bool {
        match self {
            Param::Tag(expected) => *expected == classify(value),
            Param::Predicate(p) => p.check(value),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Tag(tag) => write!(f, "{tag}"),
            Param::Predicate(p) => f.write_str(p.name()),
        }
    }
}

impl From<TypeTag> for Param {
    fn from(tag: TypeTag) -> Self {
        Param::Tag(tag)
    }
}

impl From<Predicate> for Param {
    fn from(p: Predicate) -> Self {
        Param::Predicate(p)
    }
}

impl From<&Predicate> for Param {
    fn from(p: &Predicate) -> Self {
        Param::Predicate(p.clone())
    }
}

/// Descriptor values go through `classify_config`.
impl From<Value> for Param {
    fn from(descriptor: Value) -> Self {
        Param::Tag(classify_config(&descriptor))
    }
}

impl From<&Value> for Param {
    fn from(descriptor: &Value) -> Self {
        Param::Tag(classify_config(descriptor))
    }
}

/// Build a `Vec<Param>` from a mix of tags, predicates and descriptors.
///
/// ```ignore
/// let sig = params![TypeTag::String, truthy(), Value::Null];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::predicate::Param>::new()
    };
    ($($p:expr),+ $(,)?) => {
        ::std::vec![$($crate::predicate::Param::from($p)),+]
    };
}

/// Comma-separated display of a signature.
pub fn display_params(params: &[Param]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_param_compares_classified_tag() {
        let p = Param::from(TypeTag::String);
        assert!(p.accepts(&Value::from("x"), TypeTag::String));
        assert!(!p.accepts(&Value::from(1), TypeTag::Number));
        assert!(p.accepts_value(&Value::from("")));
    }

    #[test]
    fn predicate_param_sees_raw_value() {
        let p = Param::from(Predicate::new("positive", |v| {
            v.as_f64().is_some_and(|n| n > 0.0)
        }));
        // The tag is irrelevant for predicates.
        assert!(p.accepts(&Value::from(3), TypeTag::Null));
        assert!(!p.accepts_value(&Value::from(-3)));
    }

    #[test]
    fn descriptors_convert_through_config_classifier() {
        let sig = params![Value::Null, Value::from(f64::NAN), TypeTag::Date];
        let tags: Vec<_> = sig
            .iter()
            .map(|p| match p {
                Param::Tag(t) => *t,
                Param::Predicate(_) => panic!("expected tag"),
            })
            .collect();
        assert_eq!(tags, vec![TypeTag::Null, TypeTag::NaN, TypeTag::Date]);
    }

    #[test]
    fn empty_params_macro() {
        assert!(params![].is_empty());
    }

    #[test]
    fn display_lists_tags_and_predicate_names() {
        let sig = params![TypeTag::Number, Predicate::new("even", |_| true)];
        assert_eq!(display_params(&sig), "Number, even");
    }
}
