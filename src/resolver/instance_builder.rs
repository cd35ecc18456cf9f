//! Construction of a scheduled plan.
//!
//! The [`InstanceBuilder`] walks a [`BuildPlan`] in order. For each step it
//! swaps references for cached instances, asks the locator for the
//! constructible and invokes it exactly once. The first failure aborts the
//! whole build and drops everything constructed so far.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::{Argument, Arguments, Instance, Result, SpinnerError};
use crate::locator::Locator;
use crate::resolver::scanner::{ScannedRecipe, Slot};
use crate::resolver::scheduler::BuildPlan;

/// The instances produced by one build, by name.
#[derive(Debug, Clone, Default)]
pub struct Instances {
    instances: BTreeMap<String, Instance>,
}

impl Instances {
    /// The instance named `name`.
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    /// Borrow the instance named `name` as `T`.
    pub fn get_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(Instance::downcast_ref::<T>)
    }

    /// Shared handle to the instance named `name` as `T`.
    pub fn get_arc<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.get(name).and_then(|instance| instance.downcast::<T>().ok())
    }

    /// Whether an instance named `name` was built.
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Names of all built instances, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    /// All instances, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.instances.iter().map(|(name, instance)| (name.as_str(), instance))
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether nothing was built.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Instance> {
        self.instances
    }
}

impl IntoIterator for Instances {
    type Item = (String, Instance);
    type IntoIter = std::collections::btree_map::IntoIter<String, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.into_iter()
    }
}

/// Builds the steps of one plan against one locator.
///
/// A builder owns its instance cache and is consumed by [`run`], so a cache
/// is never shared between two builds.
///
/// [`run`]: InstanceBuilder::run
pub struct InstanceBuilder<'l, L: Locator + ?Sized> {
    locator: &'l L,
    cache: BTreeMap<String, Instance>,
}

impl<'l, L: Locator + ?Sized> InstanceBuilder<'l, L> {
    /// A builder with an empty cache.
    pub fn new(locator: &'l L) -> Self {
        Self {
            locator,
            cache: BTreeMap::new(),
        }
    }

    /// Construct every step of `plan`, in order.
    pub fn run(mut self, plan: BuildPlan<'_>) -> Result<Instances> {
        let total = plan.len();
        for (k, step) in plan.into_steps().into_iter().enumerate() {
            trace!("Building {}/{}: {}", k + 1, total, step.name());
            let instance = self.construct(&step)?;
            self.cache.insert(step.name().to_string(), instance);
        }

        Ok(Instances {
            instances: self.cache,
        })
    }

    fn construct(&self, step: &ScannedRecipe<'_>) -> Result<Instance> {
        let target = step.target();
        let args = step
            .args
            .iter()
            .map(|slot| self.substitute(step, slot))
            .collect::<Result<Vec<Argument>>>()?;
        let kwds = step
            .kwds
            .iter()
            .map(|(key, slot)| Ok((key.clone(), self.substitute(step, slot)?)))
            .collect::<Result<BTreeMap<String, Argument>>>()?;

        let constructor =
            self.locator.locate(&target.module, &target.symbol).map_err(|source| {
                SpinnerError::Lookup {
                    instance: step.name().to_string(),
                    target: target.to_string(),
                    source,
                }
            })?;

        debug!("{} = {}({})", step.name(), target, render_call(&args, &kwds));

        constructor(Arguments::new(args, kwds)).map_err(|source| SpinnerError::Construction {
            instance: step.name().to_string(),
            target: target.to_string(),
            source,
        })
    }

    fn substitute(&self, step: &ScannedRecipe<'_>, slot: &Slot) -> Result<Argument> {
        match slot {
            Slot::Literal(value) => Ok(Argument::Literal(value.clone())),
            // Plans order dependencies first, so a miss means the plan was not scheduled
            Slot::Reference(name) => self.cache.get(name).cloned().map(Argument::Instance).ok_or_else(
                || SpinnerError::MissingDependency {
                    name: name.clone(),
                    required_by: step.name().to_string(),
                    suggestions: Vec::new(),
                },
            ),
        }
    }
}

fn render_call(args: &[Argument], kwds: &BTreeMap<String, Argument>) -> String {
    args.iter()
        .map(ToString::to_string)
        .chain(kwds.iter().map(|(key, value)| format!("{key}={value}")))
        .collect::<Vec<_>>()
        .join(", ")
}
