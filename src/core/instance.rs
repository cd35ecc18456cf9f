//! Built instances and the arguments handed to constructibles.
//!
//! An [`Instance`] is a type-erased, reference-counted value. Cloning one is
//! cheap and keeps the identity: every dependent that references the same
//! name receives a clone of the same `Arc`, which [`Instance::ptr_eq`] can
//! observe.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::spec::Value;

/// A constructed object.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    /// Wrap a freshly constructed value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Rust type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the wrapped value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Get a shared handle to the wrapped value as `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ArgumentError> {
        Arc::clone(&self.value).downcast::<T>().map_err(|_| ArgumentError::WrongType {
            expected: std::any::type_name::<T>(),
            actual: self.type_name.to_string(),
        })
    }

    /// Whether both handles point at the same constructed object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance<{}>", self.type_name)
    }
}

/// One argument as received by a constructible.
#[derive(Debug, Clone)]
pub enum Argument {
    /// A plain value from the spec, passed through unchanged
    Literal(Value),
    /// A previously built instance substituted for a reference
    Instance(Instance),
}

impl Argument {
    /// The literal value, if this argument is not an instance.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Instance(_) => None,
        }
    }

    /// The instance, if this argument was substituted.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Instance(instance) => write!(f, "<{}>", instance.type_name()),
        }
    }
}

/// Problems extracting typed arguments inside a constructible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// Fewer positional arguments than required
    #[error("missing positional argument {index}")]
    MissingPositional {
        /// The requested index
        index: usize,
    },
    /// A required keyword argument was not given
    #[error("missing keyword argument '{name}'")]
    MissingKeyword {
        /// The requested keyword
        name: String,
    },
    /// An argument has a different kind or type than requested
    #[error("expected {expected}, got {actual}")]
    WrongType {
        /// What the constructible asked for
        expected: &'static str,
        /// What was actually passed
        actual: String,
    },
}

/// Positional and keyword arguments for one constructible invocation.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    /// Positional arguments, in spec order
    pub args: Vec<Argument>,
    /// Keyword arguments by parameter name
    pub kwds: BTreeMap<String, Argument>,
}

impl Arguments {
    /// Create arguments from already substituted parts.
    pub fn new(args: Vec<Argument>, kwds: BTreeMap<String, Argument>) -> Self {
        Self {
            args,
            kwds,
        }
    }

    /// Positional argument at `index`.
    pub fn arg(&self, index: usize) -> Result<&Argument, ArgumentError> {
        self.args.get(index).ok_or(ArgumentError::MissingPositional {
            index,
        })
    }

    /// Keyword argument `name`.
    pub fn kwd(&self, name: &str) -> Result<&Argument, ArgumentError> {
        self.kwds.get(name).ok_or_else(|| ArgumentError::MissingKeyword {
            name: name.to_string(),
        })
    }

    /// Positional argument at `index`, which must be an instance of `T`.
    pub fn instance<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ArgumentError> {
        expect_instance(self.arg(index)?)?.downcast::<T>()
    }

    /// Keyword argument `name`, which must be an instance of `T`.
    pub fn kwd_instance<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ArgumentError> {
        expect_instance(self.kwd(name)?)?.downcast::<T>()
    }

    /// Positional argument at `index`, which must be a literal string.
    pub fn str(&self, index: usize) -> Result<&str, ArgumentError> {
        expect_str(self.arg(index)?)
    }

    /// Keyword argument `name`, which must be a literal string.
    pub fn kwd_str(&self, name: &str) -> Result<&str, ArgumentError> {
        expect_str(self.kwd(name)?)
    }

    /// Positional argument at `index`, which must be a literal integer.
    pub fn int(&self, index: usize) -> Result<i64, ArgumentError> {
        match self.arg(index)? {
            Argument::Literal(Value::Int(value)) => Ok(*value),
            other => Err(wrong_type("an integer", other)),
        }
    }

    /// Number of positional arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether there are no arguments of either kind.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwds.is_empty()
    }
}

fn expect_instance(argument: &Argument) -> Result<&Instance, ArgumentError> {
    argument.as_instance().ok_or_else(|| wrong_type("an instance", argument))
}

fn expect_str(argument: &Argument) -> Result<&str, ArgumentError> {
    match argument {
        Argument::Literal(Value::Str(value)) => Ok(value),
        other => Err(wrong_type("a string", other)),
    }
}

fn wrong_type(expected: &'static str, actual: &Argument) -> ArgumentError {
    let actual = match actual {
        Argument::Literal(value) => value.kind().to_string(),
        Argument::Instance(instance) => format!("instance of {}", instance.type_name()),
    };
    ArgumentError::WrongType {
        expected,
        actual,
    }
}
