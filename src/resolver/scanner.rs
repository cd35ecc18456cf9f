//! Reference scanning.
//!
//! Decides, once per build, which top-level arguments of a recipe are
//! references to other instances. The result is a [`ScannedRecipe`] whose
//! arguments are tagged [`Slot`]s; nothing downstream looks at raw strings
//! again.
//!
//! Rules, applied to each top-level positional and keyword argument:
//!
//! 1. A string equal to the recipe's own name is a literal.
//! 2. An argument whose index/key is in `skip_args`/`skip_kwds` is a literal.
//! 3. An explicit `{"$ref": name}` is a reference, whether or not `name`
//!    exists (a dangling one is reported by the dependency graph).
//! 4. A string equal to the name of another recipe in the store is a
//!    reference.
//! 5. Everything else, including any string nested inside a sequence or a
//!    mapping, is a literal.
//!
//! When rule 1 or 2 demotes an explicit reference, it becomes the literal
//! string of the name it pointed at.

use std::collections::{BTreeMap, BTreeSet};

use crate::spec::{ArgSpec, Recipe, SpecStore, Target, Value};

/// One argument after scanning.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Passed to the constructible unchanged
    Literal(Value),
    /// Replaced by the named instance before construction
    Reference(String),
}

impl Slot {
    /// The referenced name, if this slot is a reference.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            Self::Literal(_) => None,
        }
    }
}

/// A recipe whose arguments have been classified.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedRecipe<'s> {
    recipe: &'s Recipe,
    /// Positional arguments, in order
    pub args: Vec<Slot>,
    /// Keyword arguments
    pub kwds: BTreeMap<String, Slot>,
}

impl<'s> ScannedRecipe<'s> {
    /// Instance name.
    pub fn name(&self) -> &'s str {
        &self.recipe.name
    }

    /// What to construct.
    pub fn target(&self) -> &'s Target {
        &self.recipe.target
    }

    /// The recipe this was scanned from.
    pub fn recipe(&self) -> &'s Recipe {
        self.recipe
    }

    /// Names this recipe depends on, without duplicates.
    pub fn dependencies(&self) -> BTreeSet<&str> {
        self.args.iter().chain(self.kwds.values()).filter_map(Slot::reference).collect()
    }
}

/// Classify every argument of `recipe` against the names in `store`.
pub fn scan<'s>(recipe: &'s Recipe, store: &SpecStore) -> ScannedRecipe<'s> {
    let args = recipe
        .args
        .iter()
        .enumerate()
        .map(|(index, arg)| classify(arg, &recipe.name, recipe.skip_args.contains(&index), store))
        .collect();

    let kwds = recipe
        .kwds
        .iter()
        .map(|(key, arg)| {
            let slot = classify(arg, &recipe.name, recipe.skip_kwds.contains(key), store);
            (key.clone(), slot)
        })
        .collect();

    ScannedRecipe {
        recipe,
        args,
        kwds,
    }
}

/// Classify a single argument of the recipe named `own_name`.
pub fn classify(arg: &ArgSpec, own_name: &str, skipped: bool, store: &SpecStore) -> Slot {
    let Some(text) = arg.reference_text() else {
        return literal(arg);
    };

    if text == own_name || skipped {
        return Slot::Literal(Value::Str(text.to_string()));
    }

    match arg {
        ArgSpec::Ref(name) => Slot::Reference(name.clone()),
        ArgSpec::Value(_) if store.contains(text) => Slot::Reference(text.to_string()),
        ArgSpec::Value(value) => Slot::Literal(value.clone()),
    }
}

fn literal(arg: &ArgSpec) -> Slot {
    match arg {
        ArgSpec::Value(value) => Slot::Literal(value.clone()),
        ArgSpec::Ref(name) => Slot::Literal(Value::Str(name.clone())),
    }
}
