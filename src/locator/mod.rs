//! Resolving `(module, symbol)` pairs to constructibles.
//!
//! The resolver never knows how a target becomes callable; it asks a
//! [`Locator`]. The crate ships one implementation, [`Registry`], an
//! explicit registration table that callers fill and pass to the build.
//! Nothing is registered globally, so two builds with different registries
//! never see each other's constructibles.
//!
//! # Examples
//!
//! ```rust
//! use device_spinner::core::{Arguments, DynError};
//! use device_spinner::locator::{Locator, Registry};
//!
//! struct Laser {
//!     port: String,
//! }
//!
//! let mut registry = Registry::with_builtins();
//! registry.register("lab", "Laser", |args: Arguments| -> Result<Laser, DynError> {
//!     Ok(Laser { port: args.kwd_str("serial_port")?.to_string() })
//! });
//!
//! assert!(registry.locate("lab", "Laser").is_ok());
//! assert!(registry.locate("lab", "Lazer").is_err());
//! ```

pub mod builtins;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::constants::{BUILTINS_MODULE, BUILTINS_MODULE_QUALIFIED};
use crate::core::error::similar_names;
use crate::core::{Arguments, DynError, Instance, LookupError};

/// An invocable that builds one instance from its arguments.
pub type Constructible = Arc<dyn Fn(Arguments) -> Result<Instance, DynError> + Send + Sync>;

/// Capability to turn a `(module, symbol)` pair into a [`Constructible`].
pub trait Locator: Send + Sync {
    /// Resolve `module`/`symbol`, or report which part is unknown.
    fn locate(&self, module: &str, symbol: &str) -> Result<Constructible, LookupError>;
}

impl<L: Locator + ?Sized> Locator for &L {
    fn locate(&self, module: &str, symbol: &str) -> Result<Constructible, LookupError> {
        (**self).locate(module, symbol)
    }
}

impl<L: Locator + ?Sized> Locator for Arc<L> {
    fn locate(&self, module: &str, symbol: &str) -> Result<Constructible, LookupError> {
        (**self).locate(module, symbol)
    }
}

/// Registration table of constructibles, grouped by module.
#[derive(Clone, Default)]
pub struct Registry {
    modules: BTreeMap<String, BTreeMap<String, Constructible>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the [`builtins`] helpers already registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    /// Register a constructible returning a plain value of type `T`.
    ///
    /// The value is wrapped into an [`Instance`]; errors are boxed.
    pub fn register<T, E, F>(
        &mut self,
        module: impl Into<String>,
        symbol: impl Into<String>,
        constructor: F,
    ) -> &mut Self
    where
        T: Any + Send + Sync,
        E: Into<DynError>,
        F: Fn(Arguments) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register_raw(module, symbol, move |args| {
            constructor(args).map(Instance::new).map_err(Into::into)
        })
    }

    /// Register a constructible that produces an [`Instance`] itself.
    ///
    /// Useful for factories that hand back one of their arguments unchanged,
    /// keeping its identity.
    pub fn register_raw<F>(
        &mut self,
        module: impl Into<String>,
        symbol: impl Into<String>,
        constructor: F,
    ) -> &mut Self
    where
        F: Fn(Arguments) -> Result<Instance, DynError> + Send + Sync + 'static,
    {
        let module = module.into();
        let symbol = symbol.into();
        tracing::trace!("Registering {module}.{symbol}");
        self.modules.entry(module).or_default().insert(symbol, Arc::new(constructor));
        self
    }

    /// Whether `module.symbol` is registered.
    pub fn contains(&self, module: &str, symbol: &str) -> bool {
        self.modules.get(module).is_some_and(|symbols| symbols.contains_key(symbol))
    }

    /// Registered module names.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Register every constructible of `other` into this registry,
    /// replacing entries with the same path.
    pub fn extend(&mut self, other: Registry) -> &mut Self {
        for (module, symbols) in other.modules {
            self.modules.entry(module).or_default().extend(symbols);
        }
        self
    }
}

impl Locator for Registry {
    fn locate(&self, module: &str, symbol: &str) -> Result<Constructible, LookupError> {
        let symbols = self.modules.get(module).ok_or_else(|| LookupError::ModuleNotFound {
            module: module.to_string(),
        })?;

        symbols.get(symbol).cloned().ok_or_else(|| LookupError::SymbolNotFound {
            module: module.to_string(),
            symbol: symbol.to_string(),
            suggestions: similar_names(symbol, symbols.keys().map(String::as_str)),
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (module, symbols) in &self.modules {
            map.entry(module, &symbols.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

/// Module names under which the builtins are registered.
pub(crate) const BUILTIN_MODULES: [&str; 2] = [BUILTINS_MODULE, BUILTINS_MODULE_QUALIFIED];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Argument;
    use crate::spec::Value;

    #[derive(Debug, PartialEq)]
    struct Camera {
        exposure_ms: i64,
    }

    fn camera_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register("lab", "Camera", |args: Arguments| -> Result<Camera, DynError> {
            Ok(Camera {
                exposure_ms: args.int(0)?,
            })
        });
        registry
    }

    #[test]
    fn test_locate_and_invoke() {
        let registry = camera_registry();
        let constructor = registry.locate("lab", "Camera").unwrap();
        let instance =
            constructor(Arguments::new(vec![Argument::Literal(Value::Int(20))], BTreeMap::new()))
                .unwrap();
        assert_eq!(
            instance.downcast_ref::<Camera>(),
            Some(&Camera {
                exposure_ms: 20
            })
        );
    }

    #[test]
    fn test_constructor_errors_are_boxed() {
        let registry = camera_registry();
        let constructor = registry.locate("lab", "Camera").unwrap();
        let err = constructor(Arguments::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing positional argument 0");
    }

    #[test]
    fn test_unknown_module_and_symbol() {
        let registry = camera_registry();
        assert_eq!(
            registry.locate("optics", "Camera").err(),
            Some(LookupError::ModuleNotFound {
                module: "optics".to_string()
            })
        );

        match registry.locate("lab", "Camra").err() {
            Some(LookupError::SymbolNotFound {
                symbol,
                suggestions,
                ..
            }) => {
                assert_eq!(symbol, "Camra");
                assert_eq!(suggestions, vec!["Camera".to_string()]);
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn test_extend_and_contains() {
        let mut registry = Registry::with_builtins();
        registry.extend(camera_registry());
        assert!(registry.contains("lab", "Camera"));
        assert!(registry.contains("builtins", "to_list"));
        assert!(registry.contains("device_spinner.builtins", "to_list"));
        assert!(!registry.contains("lab", "Laser"));
        assert!(registry.modules().any(|m| m == "lab"));
    }

    #[test]
    fn test_locator_through_references() {
        fn locate_via<L: Locator>(locator: L) -> bool {
            locator.locate("lab", "Camera").is_ok()
        }

        let registry = camera_registry();
        assert!(locate_via(&registry));
        assert!(locate_via(Arc::new(registry)));
    }
}
