//! Dispatcher - signature / arity による実装の選択と呼び出し
//!
//! # 使用例
//! ```ignore
//! let mut d = Dispatcher::new();
//! d.by_signature(params![TypeTag::String]).using(Function::constant("s"))
//!     .by_signature(params![TypeTag::Number]).using(Function::constant("n"))
//!     .on_fallback(Function::constant("?"));
//!
//! let f = d.expose();
//! assert_eq!(f.call(&Value::Undefined, &[Value::from("x")])?, Value::from("s"));
//! ```
//!
//! # 呼び出し形式（すべて同じ matcher を通る）
//! - `invoke(context, args)`: 直接呼び出し
//! - `invoke_with(context, iterable)`: 任意の iterable を Vec に正規化してから呼び出し
//! - `bind_to(context)`: context を固定した `Function`
//! - `expose()`: 設定 API を持たない `Function`。呼び出し側の context をそのまま渡す

mod table;

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::DispatchError;
use crate::ids::DispatcherId;
use crate::predicate::{Param, display_params, shape};
use crate::registry::TypeRegistry;
use crate::value::{Function, Value};

pub use self::table::Match;
use self::table::{ArityEntry, DispatchTable, SharedTable, SignatureEntry, dispatch, read, write};

/// Runtime argument-based dispatcher.
///
/// Registration takes `&mut self`; invocation takes `&self`. Invocables
/// returned by `expose` and `bind_to` share the live table, so they see
/// entries registered after they were created. A clone starts from a copy of
/// the table and registers independently.
pub struct Dispatcher {
    table: Arc<SharedTable>,
    registry: Arc<TypeRegistry>,
}

/// Pending registration: attach the implementation with `using`.
#[must_use = "a registration does nothing until `using` attaches an implementation"]
pub struct Use<'d> {
    dispatcher: &'d mut Dispatcher,
    pending: Pending,
}

enum Pending {
    Signature(Vec<Param>),
    Arity(Option<usize>),
}

impl<'d> Use<'d> {
    pub fn using(self, method: Function) -> &'d mut Dispatcher {
        let Use { dispatcher, pending } = self;
        let mut table = write(&dispatcher.table);
        let id = table.id;
        match pending {
            Pending::Signature(params) => {
                debug!(
                    dispatcher = %id,
                    entry = table.signatures.len(),
                    signature = %display_params(&params),
                    "signature registered"
                );
                table.signatures.push(SignatureEntry { params, method });
            }
            Pending::Arity(count) => {
                let arity = count.unwrap_or_else(|| method.arity());
                debug!(
                    dispatcher = %id,
                    entry = table.arities.len(),
                    arity,
                    "arity registered"
                );
                table.arities.push(ArityEntry { arity, method });
            }
        }
        drop(table);
        dispatcher
    }
}

impl Dispatcher {
    /// An empty dispatcher resolving custom type names through the global
    /// registry.
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            table: Arc::new(RwLock::new(DispatchTable::new(DispatcherId::generate()))),
            registry,
        }
    }

    pub fn id(&self) -> DispatcherId {
        read(&self.table).id
    }

    // ────────────────────────────────────────────────────────────────────
    // registration
    // ────────────────────────────────────────────────────────────────────

    /// Register a signature entry. Entries are matched in registration
    /// order and never merged or reordered.
    pub fn by_signature<I, P>(&mut self, params: I) -> Use<'_>
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        let params = params.into_iter().map(Into::into).collect();
        Use {
            dispatcher: self,
            pending: Pending::Signature(params),
        }
    }

    /// Register a signature whose elements are given by name, resolved
    /// through this dispatcher's type registry.
    pub fn by_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Use<'_>, DispatchError> {
        let params = names
            .iter()
            .map(|name| self.registry.resolve(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.by_signature(params))
    }

    /// Sugar for a one-element signature holding a `shape` predicate.
    pub fn by_shape<I, K, P>(&mut self, entries: I) -> Use<'_>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Param>,
    {
        self.by_signature([shape(entries)])
    }

    /// Register an arity entry matching calls with exactly `count` arguments.
    pub fn by_arity(&mut self, count: usize) -> Use<'_> {
        Use {
            dispatcher: self,
            pending: Pending::Arity(Some(count)),
        }
    }

    /// Register an arity entry keyed by the implementation's declared arity,
    /// snapshotted when `using` is called.
    pub fn by_declared_arity(&mut self) -> Use<'_> {
        Use {
            dispatcher: self,
            pending: Pending::Arity(None),
        }
    }

    /// Set (or replace) the fallback.
    pub fn on_fallback(&mut self, method: Function) -> &mut Self {
        write(&self.table).fallback = Some(method);
        self
    }

    /// Set (or replace) the error handler. It is called with one argument,
    /// the array of rejected arguments, and its return value becomes the
    /// dispatch result.
    pub fn on_error(&mut self, method: Function) -> &mut Self {
        write(&self.table).error = Some(method);
        self
    }

    // ────────────────────────────────────────────────────────────────────
    // invocation
    // ────────────────────────────────────────────────────────────────────

    pub fn invoke(&self, context: &Value, args: &[Value]) -> Result<Value, DispatchError> {
        dispatch(&self.table, context, args)
    }

    pub fn invoke_with<I>(&self, context: &Value, args: I) -> Result<Value, DispatchError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        dispatch(&self.table, context, &args)
    }

    /// An invocable with `context` fixed, whatever it is later called with.
    pub fn bind_to(&self, context: Value) -> Function {
        self.expose().bind(context)
    }

    /// A plain invocable without the registration API. Its context is the
    /// one supplied at each call site.
    pub fn expose(&self) -> Function {
        let table = Arc::clone(&self.table);
        Function::named("overload", 0, move |context, args| {
            dispatch(&table, context, args)
        })
    }

    /// Which tier a call with `args` would take, without invoking anything.
    pub fn resolve(&self, args: &[Value]) -> Match {
        read(&self.table).resolve(args)
    }

    pub fn signature_count(&self) -> usize {
        read(&self.table).signatures.len()
    }

    pub fn arity_count(&self) -> usize {
        read(&self.table).arities.len()
    }

    pub fn has_fallback(&self) -> bool {
        read(&self.table).fallback.is_some()
    }

    pub fn has_error_handler(&self) -> bool {
        read(&self.table).error.is_some()
    }
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        let table = read(&self.table).clone();
        Self {
            table: Arc::new(RwLock::new(table)),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = read(&self.table);
        f.debug_struct("Dispatcher")
            .field("id", &table.id)
            .field("signatures", &table.signatures.len())
            .field("arities", &table.arities.len())
            .field("fallback", &table.fallback.is_some())
            .field("error", &table.error.is_some())
            .finish()
    }
}
