//! Built-in predicates and combinators.

use std::sync::OnceLock;

use super::{Param, Predicate, display_params};
use crate::classify::classify;
use crate::value::Value;

/// Always succeeds.
pub fn wild() -> Predicate {
    static WILD: OnceLock<Predicate> = OnceLock::new();
    WILD.get_or_init(|| Predicate::new("wild", |_| true)).clone()
}

pub fn truthy() -> Predicate {
    static TRUTHY: OnceLock<Predicate> = OnceLock::new();
    TRUTHY
        .get_or_init(|| Predicate::new("truthy", Value::is_truthy))
        .clone()
}

pub fn falsy() -> Predicate {
    static FALSY: OnceLock<Predicate> = OnceLock::new();
    FALSY
        .get_or_init(|| Predicate::new("falsy", |v| !v.is_truthy()))
        .clone()
}

/// Succeeds when the value's tag is one of the listed tags, or one of the
/// listed predicates succeeds on it.
pub fn any<I, P>(items: I) -> Predicate
where
    I: IntoIterator<Item = P>,
    P: Into<Param>,
{
    let items: Vec<Param> = items.into_iter().map(Into::into).collect();
    let name = format!("any({})", display_params(&items));
    Predicate::new(name, move |v| matches_any(&items, v))
}

/// Negation of `any`.
pub fn except<I, P>(items: I) -> Predicate
where
    I: IntoIterator<Item = P>,
    P: Into<Param>,
{
    let items: Vec<Param> = items.into_iter().map(Into::into).collect();
    let name = format!("except({})", display_params(&items));
    Predicate::new(name, move |v| !matches_any(&items, v))
}

/// Flat structural check on an object.
///
/// Every key listed must be present on the value and satisfy its element.
/// A missing key reads as undefined, so it only satisfies `Undefined` (or a
/// predicate accepting undefined). Keys not listed are ignored. Non-object
/// values never match.
pub fn shape<I, K, P>(entries: I) -> Predicate
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<Param>,
{
    let entries: Vec<(String, Param)> = entries
        .into_iter()
        .map(|(k, p)| (k.into(), p.into()))
        .collect();
    let name = format!(
        "shape{{{}}}",
        entries
            .iter()
            .map(|(k, p)| format!("{k}: {p}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Predicate::new(name, move |v| matches_shape(&entries, v))
}

fn matches_any(items: &[Param], value: &Value) -> bool {
    let tag = classify(value);
    items.iter().any(|item| item.accepts(value, tag))
}

fn matches_shape(entries: &[(String, Param)], value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    entries.iter().all(|(key, param)| {
        let field = map.get(key).unwrap_or(&Value::Undefined);
        param.accepts_value(field)
    })
}
