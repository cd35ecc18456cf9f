//! Construction recipes.
//!
//! A [`Recipe`] says how to build one named instance: which constructible to
//! call ([`Target`]), which positional and keyword arguments to pass, and
//! which of those arguments must never be treated as references.
//!
//! # Spec entry shapes
//!
//! ```yaml
//! # module + class
//! my_bike:
//!   module: vehicles
//!   class: Bike
//!   args: [front_wheel, back_wheel]
//!
//! # dotted class path, no module
//! settings:
//!   class: builtins.dict
//!   kwds: {name: settings}
//!
//! # factory
//! spokes:
//!   factory: builtins.to_list
//!   args: [spoke0, spoke1]
//!
//! # explicit reference and skip lists
//! microscope:
//!   module: lab
//!   class: Microscope
//!   kwds:
//!     camera: {$ref: camera}
//!     label: camera
//!   skip_kwds: [label]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::constants::{
    ARGS_KEY, CLASS_KEY, FACTORY_KEY, KWDS_KEY, MODULE_KEY, REF_KEY, SKIP_ARGS_KEY, SKIP_KWDS_KEY,
};
use crate::core::{Result, SpinnerError};
use crate::spec::Value;

/// Whether a target is a class (constructed) or a factory (invoked).
///
/// The resolver treats both the same way; the kind is kept for logs and
/// error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A type constructed from the arguments
    Class,
    /// A function invoked with the arguments
    Factory,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::Factory => f.write_str("factory"),
        }
    }
}

/// The `(module, symbol)` pair a locator resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Module path, e.g. `lab.devices`
    pub module: String,
    /// Class or factory name inside the module
    pub symbol: String,
    /// Class or factory
    pub kind: TargetKind,
}

impl Target {
    /// A class target.
    pub fn class(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            kind: TargetKind::Class,
        }
    }

    /// A factory target.
    pub fn factory(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            kind: TargetKind::Factory,
        }
    }

    /// Split a dotted path such as `lab.devices.Camera` at its last dot.
    ///
    /// Returns `None` when the path has no module part.
    pub fn from_dotted(path: &str, kind: TargetKind) -> Option<Self> {
        let (module, symbol) = path.rsplit_once('.')?;
        if module.is_empty() || symbol.is_empty() {
            return None;
        }
        Some(Self {
            module: module.to_string(),
            symbol: symbol.to_string(),
            kind,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.symbol)
    }
}

/// One argument as written in a recipe.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSpec {
    /// A plain value; a top-level string may still match an instance name
    Value(Value),
    /// An explicit reference to another instance, written `{"$ref": name}`
    Ref(String),
}

impl ArgSpec {
    /// Interpret a parsed value, recognizing the `{"$ref": name}` form.
    ///
    /// Only a mapping whose single key is `$ref` with a string value counts;
    /// anything else stays a plain value.
    pub fn from_value(value: Value) -> Self {
        if let Value::Map(map) = &value {
            if map.len() == 1 {
                if let Some(Value::Str(name)) = map.get(REF_KEY) {
                    return Self::Ref(name.clone());
                }
            }
        }
        Self::Value(value)
    }

    /// The text a reference would be matched on, if any.
    pub(crate) fn reference_text(&self) -> Option<&str> {
        match self {
            Self::Value(Value::Str(text)) | Self::Ref(text) => Some(text),
            Self::Value(_) => None,
        }
    }
}

impl From<Value> for ArgSpec {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

macro_rules! arg_spec_from_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ArgSpec {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

arg_spec_from_literal!(&str, String, bool, i32, i64, f64);

/// How to build one named instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Instance name, unique within a spec store
    pub name: String,
    /// What to construct or invoke
    pub target: Target,
    /// Positional arguments
    pub args: Vec<ArgSpec>,
    /// Keyword arguments
    pub kwds: BTreeMap<String, ArgSpec>,
    /// Positional indices never treated as references
    pub skip_args: BTreeSet<usize>,
    /// Keyword names never treated as references
    pub skip_kwds: BTreeSet<String>,
}

impl Recipe {
    /// A recipe with no arguments.
    pub fn new(name: impl Into<String>, target: Target) -> Self {
        Self {
            name: name.into(),
            target,
            args: Vec::new(),
            kwds: BTreeMap::new(),
            skip_args: BTreeSet::new(),
            skip_kwds: BTreeSet::new(),
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn with_arg(mut self, value: impl Into<ArgSpec>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append a positional explicit reference.
    #[must_use]
    pub fn with_arg_ref(mut self, name: impl Into<String>) -> Self {
        self.args.push(ArgSpec::Ref(name.into()));
        self
    }

    /// Set a keyword argument.
    #[must_use]
    pub fn with_kwd(mut self, key: impl Into<String>, value: impl Into<ArgSpec>) -> Self {
        self.kwds.insert(key.into(), value.into());
        self
    }

    /// Set a keyword explicit reference.
    #[must_use]
    pub fn with_kwd_ref(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.kwds.insert(key.into(), ArgSpec::Ref(name.into()));
        self
    }

    /// Never treat positional argument `index` as a reference.
    #[must_use]
    pub fn skip_arg(mut self, index: usize) -> Self {
        self.skip_args.insert(index);
        self
    }

    /// Never treat keyword argument `key` as a reference.
    #[must_use]
    pub fn skip_kwd(mut self, key: impl Into<String>) -> Self {
        self.skip_kwds.insert(key.into());
        self
    }

    /// Parse one spec entry.
    ///
    /// `value` must be a mapping using the keys listed in
    /// [`crate::constants`]. Unknown keys are rejected so that typos such
    /// as `kwargs` do not silently drop arguments.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        let invalid = |reason: String| SpinnerError::InvalidRecipe {
            instance: name.to_string(),
            reason,
        };

        let Some(entry) = value.as_map() else {
            return Err(invalid(format!("expected a mapping, found {}", value.kind())));
        };

        const KNOWN_KEYS: [&str; 7] =
            [MODULE_KEY, CLASS_KEY, FACTORY_KEY, ARGS_KEY, KWDS_KEY, SKIP_ARGS_KEY, SKIP_KWDS_KEY];
        if let Some(unknown) = entry.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            return Err(invalid(format!("unknown key '{unknown}'")));
        }

        let target = parse_target(
            text_field(entry, MODULE_KEY).map_err(invalid)?,
            text_field(entry, CLASS_KEY).map_err(invalid)?,
            text_field(entry, FACTORY_KEY).map_err(invalid)?,
        )
        .map_err(invalid)?;

        let args: Vec<ArgSpec> = match entry.get(ARGS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Seq(items)) => items.iter().cloned().map(ArgSpec::from_value).collect(),
            Some(other) => {
                return Err(invalid(format!("'{ARGS_KEY}' must be a sequence, found {}", other.kind())));
            }
        };

        let kwds: BTreeMap<String, ArgSpec> = match entry.get(KWDS_KEY) {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Map(map)) => {
                map.iter().map(|(k, v)| (k.clone(), ArgSpec::from_value(v.clone()))).collect()
            }
            Some(other) => {
                return Err(invalid(format!("'{KWDS_KEY}' must be a mapping, found {}", other.kind())));
            }
        };

        let skip_args = list_field(entry, SKIP_ARGS_KEY, |item| match item {
            Value::Int(index) => usize::try_from(*index)
                .map_err(|_| format!("'{SKIP_ARGS_KEY}' index {index} is negative")),
            other => Err(format!(
                "'{SKIP_ARGS_KEY}' entries must be argument indices, found {}",
                other.kind()
            )),
        })
        .map_err(invalid)?;

        let skip_kwds = list_field(entry, SKIP_KWDS_KEY, |item| match item {
            Value::Str(key) => Ok(key.clone()),
            other => Err(format!(
                "'{SKIP_KWDS_KEY}' entries must be keyword names, found {}",
                other.kind()
            )),
        })
        .map_err(invalid)?;

        Ok(Self {
            name: name.to_string(),
            target,
            args,
            kwds,
            skip_args,
            skip_kwds,
        })
    }
}

fn text_field<'v>(
    entry: &'v BTreeMap<String, Value>,
    key: &str,
) -> std::result::Result<Option<&'v str>, String> {
    match entry.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Str(text)) => Ok(Some(text)),
        Some(other) => Err(format!("'{key}' must be a string, found {}", other.kind())),
    }
}

fn list_field<T: Ord>(
    entry: &BTreeMap<String, Value>,
    key: &str,
    item: impl Fn(&Value) -> std::result::Result<T, String>,
) -> std::result::Result<BTreeSet<T>, String> {
    match entry.get(key) {
        None | Some(Value::Null) => Ok(BTreeSet::new()),
        Some(Value::Seq(items)) => items.iter().map(item).collect(),
        Some(other) => Err(format!("'{key}' must be a sequence, found {}", other.kind())),
    }
}

fn parse_target(
    module: Option<&str>,
    class: Option<&str>,
    factory: Option<&str>,
) -> std::result::Result<Target, String> {
    let (path, kind) = match (class, factory) {
        (Some(class), None) => (class, TargetKind::Class),
        (None, Some(factory)) => (factory, TargetKind::Factory),
        (Some(_), Some(_)) => {
            return Err(format!("'{CLASS_KEY}' and '{FACTORY_KEY}' are mutually exclusive"));
        }
        (None, None) => return Err(format!("one of '{CLASS_KEY}' or '{FACTORY_KEY}' is required")),
    };

    match module {
        Some(module) => Ok(Target {
            module: module.to_string(),
            symbol: path.to_string(),
            kind,
        }),
        None => Target::from_dotted(path, kind).ok_or_else(|| {
            format!("'{path}' is not a dotted path and no '{MODULE_KEY}' was given")
        }),
    }
}
