//! overload-core
//!
//! Runtime argument-based dispatch: register implementations against type
//! signatures, argument counts, a fallback and an error handler, then call
//! through the dispatcher and let the first matching entry run.
//!
//! # モジュール構成
//! - **value**: 動的な値（Value, Function, Element, RegExp）
//! - **classify**: TypeTag と 2 つの classifier（実行時の値 / 登録時の descriptor）
//! - **predicate**: Predicate, Param と combinator（wild, truthy, falsy, any, except, shape）
//! - **registry**: カスタム型の TypeRegistry（global + 明示的なインスタンス）
//! - **dispatcher**: Dispatcher（登録 API と 4 つの呼び出し形式）
//! - **ids**: DispatcherId（ログ用）
//! - **error**: DispatchError

pub mod classify;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod predicate;
pub mod registry;
pub mod value;

pub use self::classify::{TypeTag, classify, classify_config};
pub use self::dispatcher::{Dispatcher, Match, Use};
pub use self::error::DispatchError;
pub use self::ids::DispatcherId;
pub use self::predicate::{Param, Predicate, any, except, falsy, shape, truthy, wild};
pub use self::registry::TypeRegistry;
pub use self::value::{Element, Function, RegExp, Value};

/// Define a custom type in the global registry.
pub fn define_type<F>(name: impl Into<String>, check: F) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    TypeRegistry::global().define_type(name, check)
}

/// Define several custom types in the global registry.
pub fn define_types<I, K, F>(definitions: I) -> std::sync::Arc<TypeRegistry>
where
    I: IntoIterator<Item = (K, F)>,
    K: Into<String>,
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let registry = TypeRegistry::global();
    registry.define_types(definitions);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_definitions_are_visible_to_new_dispatchers() {
        define_type("lib_test_even", |v| v.as_f64().is_some_and(|n| n % 2.0 == 0.0));
        define_types([("lib_test_odd", |v: &Value| {
            v.as_f64().is_some_and(|n| n % 2.0 != 0.0)
        })]);

        let mut d = Dispatcher::new();
        d.by_names(&["lib_test_even"])
            .unwrap()
            .using(Function::constant("even"))
            .by_names(&["lib_test_odd"])
            .unwrap()
            .using(Function::constant("odd"));

        assert_eq!(d.invoke(&Value::Null, &[Value::from(2)]).unwrap(), Value::from("even"));
        assert_eq!(d.invoke(&Value::Null, &[Value::from(3)]).unwrap(), Value::from("odd"));
    }
}
