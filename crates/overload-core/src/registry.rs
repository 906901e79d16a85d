//! TypeRegistry - カスタム型（名前付き Predicate）の登録と管理
//!
//! # 設計
//! - 各 Dispatcher は `Arc<TypeRegistry>` を保持する
//! - `TypeRegistry::global()` はプロセス全体で共有されるデフォルト
//! - 同じ名前で再定義すると上書き（last writer wins）
//!
//! # 学習ポイント
//! - `RwLock<HashMap<..>>` による共有可変状態
//! - `OnceLock` による遅延初期化された global

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::classify::TypeTag;
use crate::error::DispatchError;
use crate::predicate::{Param, Predicate, falsy, truthy, wild};
use crate::value::Value;

/// Named extension types, shared by every dispatcher holding the registry.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Predicate>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide default registry.
    pub fn global() -> Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())).clone()
    }

    /// Define (or redefine) a custom type and return its predicate.
    pub fn define_type<F>(&self, name: impl Into<String>, check: F) -> Predicate
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let predicate = Predicate::new(name.as_str(), check);
        self.insert(name, predicate.clone());
        predicate
    }

    /// Define several custom types at once, one check function per name.
    pub fn define_types<I, K, F>(&self, definitions: I) -> &Self
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        for (name, check) in definitions {
            self.define_type(name, check);
        }
        self
    }

    fn insert(&self, name: String, predicate: Predicate) {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if types.insert(name.clone(), predicate).is_some() {
            debug!(type_name = %name, "custom type redefined");
        } else {
            debug!(type_name = %name, "custom type defined");
        }
    }

    pub fn get(&self, name: &str) -> Option<Predicate> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Resolve a signature element by name.
    ///
    /// Lookup order: built-in tag names, custom types, then the built-in
    /// predicates `wild`, `truthy` and `falsy`.
    pub fn resolve(&self, name: &str) -> Result<Param, DispatchError> {
        if let Some(tag) = TypeTag::from_name(name) {
            return Ok(Param::Tag(tag));
        }
        if let Some(custom) = self.get(name) {
            return Ok(Param::Predicate(custom));
        }
        match name {
            "wild" => Ok(Param::Predicate(wild())),
            "truthy" => Ok(Param::Predicate(truthy())),
            "falsy" => Ok(Param::Predicate(falsy())),
            _ => Err(DispatchError::UnknownType(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_jquery(v: &Value) -> bool {
        v.get("jquery").is_some()
    }

    fn is_positive(v: &Value) -> bool {
        v.as_f64().is_some_and(|n| n > 0.0)
    }

    #[test]
    fn define_and_get() {
        let registry = TypeRegistry::new();
        let p = registry.define_type("$", is_jquery);
        assert_eq!(p.name(), "$");

        let fetched = registry.get("$").unwrap();
        assert!(fetched.check(&Value::object([("jquery", "3.7")])));
        assert!(!fetched.check(&Value::object([("other", 1)])));
    }

    #[test]
    fn redefinition_overwrites() {
        let registry = TypeRegistry::new();
        registry.define_type("small", |v| v.as_f64().is_some_and(|n| n < 10.0));
        registry.define_type("small", |v| v.as_f64().is_some_and(|n| n < 2.0));

        let small = registry.get("small").unwrap();
        assert!(!small.check(&Value::from(5)));
        assert_eq!(registry.names(), vec!["small".to_string()]);
    }

    #[test]
    fn define_types_registers_under_paired_names() {
        let registry = TypeRegistry::new();
        registry
            .define_types([
                ("positive", is_positive as fn(&Value) -> bool),
                ("empty", |v: &Value| v.as_str() == Some("")),
            ])
            .define_type("never", |_| false);

        assert_eq!(registry.names(), vec!["empty", "never", "positive"]);
        assert_eq!(registry.get("positive").unwrap().name(), "positive");
        assert!(registry.contains("empty"));
    }

    #[test]
    fn resolve_order() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.resolve("Number"),
            Ok(Param::Tag(TypeTag::Number))
        ));
        assert!(matches!(
            registry.resolve("wild"),
            Ok(Param::Predicate(p)) if p.name() == "wild"
        ));

        registry.define_type("wild", |_| false);
        let Ok(Param::Predicate(custom)) = registry.resolve("wild") else {
            panic!("expected predicate");
        };
        assert!(!custom.check(&Value::Null));

        assert!(matches!(
            registry.resolve("nope"),
            Err(DispatchError::UnknownType(name)) if name == "nope"
        ));
    }

    #[test]
    fn global_is_shared() {
        TypeRegistry::global().define_type("registry_test_shared", |_| true);
        assert!(TypeRegistry::global().contains("registry_test_shared"));
    }
}
