use thiserror::Error;

use crate::value::{Value, display_args};

#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No signature, arity or fallback matched and no error handler was set.
    #[error("no implementation matched arguments ({})", display_args(.args))]
    NoMatch { args: Vec<Value> },

    #[error("unknown type name '{0}'")]
    UnknownType(String),

    /// A value thrown by an implementation.
    #[error("raised: {0}")]
    Raised(Value),
}

impl DispatchError {
    pub fn no_match(args: &[Value]) -> Self {
        Self::NoMatch {
            args: args.to_vec(),
        }
    }

    pub fn raise(value: impl Into<Value>) -> Self {
        Self::Raised(value.into())
    }

    /// The rejected arguments, when this is a `NoMatch`.
    pub fn rejected_args(&self) -> Option<&[Value]> {
        match self {
            Self::NoMatch { args } => Some(args),
            _ => None,
        }
    }
}
