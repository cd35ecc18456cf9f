//! The spec store: name → recipe.
//!
//! A [`SpecStore`] is the read-only input of a build. It can be assembled
//! programmatically from [`Recipe`]s or parsed from an already loaded
//! [`Value`] mapping (for example the `devices` section of a configuration
//! file, see [`crate::config`]).
//!
//! # Examples
//!
//! ```rust
//! use device_spinner::spec::{Recipe, SpecStore, Target};
//!
//! let store = SpecStore::from_yaml_str(
//!     r#"
//! my_bike:
//!   module: vehicles
//!   class: Bike
//!   args: [my_front_wheel, my_back_wheel]
//! my_front_wheel: {module: vehicles, class: Wheel}
//! "#,
//! )
//! .unwrap();
//! assert_eq!(store.len(), 2);
//!
//! let mut store = SpecStore::new();
//! store.insert(Recipe::new("hub", Target::class("vehicles", "Hub"))).unwrap();
//! assert!(store.contains("hub"));
//! ```

pub mod recipe;
pub mod value;

pub use recipe::{ArgSpec, Recipe, Target, TargetKind};
pub use value::Value;

use std::collections::BTreeMap;

use crate::core::{Result, SpinnerError};

/// Immutable collection of recipes keyed by instance name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecStore {
    recipes: BTreeMap<String, Recipe>,
}

impl SpecStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe. Names must be unique.
    pub fn insert(&mut self, recipe: Recipe) -> Result<()> {
        if self.recipes.contains_key(&recipe.name) {
            return Err(SpinnerError::InvalidRecipe {
                instance: recipe.name,
                reason: "an instance with this name is already defined".to_string(),
            });
        }
        self.recipes.insert(recipe.name.clone(), recipe);
        Ok(())
    }

    /// Build a store from recipes, rejecting duplicate names.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Result<Self> {
        let mut store = Self::new();
        for recipe in recipes {
            store.insert(recipe)?;
        }
        Ok(store)
    }

    /// Parse a mapping of instance name → spec entry.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(entries) = value.as_map() else {
            return Err(SpinnerError::Other {
                message: format!("a spec must be a mapping of instance names, found {}", value.kind()),
            });
        };

        let mut store = Self::new();
        for (name, entry) in entries {
            store.insert(Recipe::from_value(name, entry)?)?;
        }
        Ok(store)
    }

    /// Parse a YAML spec mapping.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(source)?;
        Self::from_value(&value)
    }

    /// Parse a TOML spec mapping.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let value: Value = toml::from_str(source)?;
        Self::from_value(&value)
    }

    /// The recipe for `name`.
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    /// Whether a recipe named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// All instance names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    /// All recipes, sorted by name.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the store has no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
