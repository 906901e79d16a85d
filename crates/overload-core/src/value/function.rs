//! Function - 呼び出し可能な値
//!
//! dispatcher の実装（implementation）も、`expose()` / `bind_to()` が返す
//! 呼び出し形式も、すべてこの `Function` で表現します。
//!
//! # 学習ポイント
//! - `Arc<dyn Fn ...>` による type erasure
//! - context（JS でいう `this`）を明示的な引数として渡す

use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::error::DispatchError;

type Body = dyn Fn(&Value, &[Value]) -> Result<Value, DispatchError> + Send + Sync;

/// An invocable value: a body taking `(context, args)` plus a declared arity.
///
/// The declared arity is what `by_declared_arity` snapshots at registration time,
/// it is never inferred from the closure.
#[derive(Clone)]
pub struct Function {
    name: Option<Arc<str>>,
    arity: usize,
    body: Arc<Body>,
}

impl Function {
    pub fn new<F>(arity: usize, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            arity,
            body: Arc::new(body),
        }
    }

    pub fn named<F>(name: impl Into<Arc<str>>, arity: usize, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            ..Self::new(arity, body)
        }
    }

    /// A zero-arity function that ignores its context and arguments.
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(0, move |_, _| Ok(value.clone()))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, context: &Value, args: &[Value]) -> Result<Value, DispatchError> {
        (self.body)(context, args)
    }

    /// Fix the context: the returned function ignores whatever context it is
    /// later called with.
    pub fn bind(&self, context: Value) -> Function {
        let inner = self.clone();
        Function {
            name: Some(format!("bound {}", self.name().unwrap_or("")).into()),
            arity: self.arity,
            body: Arc::new(move |_, args| inner.call(&context, args)),
        }
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) if !name.is_empty() => write!(f, "[Function: {name}]"),
            _ => f.write_str("[Function (anonymous)]"),
        }
    }
}
