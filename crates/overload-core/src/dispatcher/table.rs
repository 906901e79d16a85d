//! Dispatch table and the matcher.
//!
//! The table lives behind an `Arc<RwLock<..>>` shared by the dispatcher and
//! every invocable it hands out. The read lock is held only while the
//! matcher picks an entry; the selected implementation runs unlocked, so it
//! may call back into the same dispatcher.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::classify::{TypeTag, classify_all};
use crate::error::DispatchError;
use crate::ids::DispatcherId;
use crate::predicate::{Param, display_params};
use crate::value::{Function, Value};

#[derive(Debug, Clone)]
pub(crate) struct SignatureEntry {
    pub(crate) params: Vec<Param>,
    pub(crate) method: Function,
}

#[derive(Debug, Clone)]
pub(crate) struct ArityEntry {
    pub(crate) arity: usize,
    pub(crate) method: Function,
}

/// Which tier of the table a call resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Index into the signature entries, in registration order.
    Signature(usize),
    /// Index into the arity entries, in registration order.
    Arity(usize),
    Fallback,
    ErrorHandler,
    /// Nothing matched and no error handler is set.
    None,
}

#[derive(Debug, Clone)]
pub(crate) struct DispatchTable {
    pub(crate) id: DispatcherId,
    pub(crate) signatures: Vec<SignatureEntry>,
    pub(crate) arities: Vec<ArityEntry>,
    pub(crate) fallback: Option<Function>,
    pub(crate) error: Option<Function>,
}

impl DispatchTable {
    pub(crate) fn new(id: DispatcherId) -> Self {
        Self {
            id,
            signatures: Vec::new(),
            arities: Vec::new(),
            fallback: None,
            error: None,
        }
    }

    /// Walk the tiers: signatures, then arities, then fallback, then error.
    pub(crate) fn resolve(&self, args: &[Value]) -> Match {
        if !self.signatures.is_empty() {
            let tags = classify_all(args);
            for (index, entry) in self.signatures.iter().enumerate() {
                if signature_matches(&entry.params, args, &tags) {
                    return Match::Signature(index);
                }
                trace!(
                    dispatcher = %self.id,
                    entry = index,
                    signature = %display_params(&entry.params),
                    "signature rejected"
                );
            }
        }

        if let Some(index) = self.arities.iter().position(|e| e.arity == args.len()) {
            return Match::Arity(index);
        }

        if self.fallback.is_some() {
            Match::Fallback
        } else if self.error.is_some() {
            Match::ErrorHandler
        } else {
            Match::None
        }
    }

    /// The implementation behind a resolved tier.
    fn method(&self, selected: Match) -> Option<Function> {
        match selected {
            Match::Signature(index) => Some(self.signatures[index].method.clone()),
            Match::Arity(index) => Some(self.arities[index].method.clone()),
            Match::Fallback => self.fallback.clone(),
            Match::ErrorHandler => self.error.clone(),
            Match::None => None,
        }
    }
}

pub(crate) type SharedTable = RwLock<DispatchTable>;

pub(crate) fn read(table: &SharedTable) -> RwLockReadGuard<'_, DispatchTable> {
    table.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(table: &SharedTable) -> RwLockWriteGuard<'_, DispatchTable> {
    table.write().unwrap_or_else(PoisonError::into_inner)
}

/// Resolve against the current table and invoke. Errors raised by the
/// selected implementation are returned as they are.
pub(crate) fn dispatch(
    table: &SharedTable,
    context: &Value,
    args: &[Value],
) -> Result<Value, DispatchError> {
    let (id, selected, method) = {
        let table = read(table);
        let selected = table.resolve(args);
        (table.id, selected, table.method(selected))
    };
    debug!(
        dispatcher = %id,
        args = args.len(),
        selected = ?selected,
        "dispatch"
    );
    match (selected, method) {
        // The error handler gets the rejected list as its one argument, with
        // no context.
        (Match::ErrorHandler, Some(handler)) => {
            handler.call(&Value::Undefined, &[Value::Array(args.to_vec())])
        }
        (_, Some(method)) => method.call(context, args),
        (_, None) => Err(DispatchError::no_match(args)),
    }
}

fn signature_matches(params: &[Param], args: &[Value], tags: &[TypeTag]) -> bool {
    if params.len() != args.len() {
        return false;
    }
    params
        .iter()
        .zip(args.iter().zip(tags))
        .all(|(param, (arg, tag))| param.accepts(arg, *tag))
}
