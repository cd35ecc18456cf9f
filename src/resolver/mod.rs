//! Dependency resolution and construction.
//!
//! This is the engine of device-spinner: given a [`SpecStore`] and a
//! [`Locator`], it builds every instance exactly once, each after the
//! instances its arguments reference.
//!
//! # Pipeline
//!
//! ```text
//! SpecStore ──scan──▶ ScannedRecipe* ──graph──▶ DependencyGraph ──order──▶ BuildPlan
//!                                                                             │
//!              Instances ◀──construct (Locator, instance cache)───────────────┘
//! ```
//!
//! 1. [`scanner`] classifies every top-level argument as a literal or a
//!    reference (own name and skipped fields are always literals; nothing
//!    inside a nested sequence or mapping is ever a reference).
//! 2. [`dependency_graph`] turns references into edges and rejects dangling
//!    references.
//! 3. [`scheduler`] orders the graph topologically and rejects cycles.
//! 4. [`instance_builder`] constructs in order, substituting cached
//!    instances, and stops at the first failure.
//!
//! Steps 1–3 complete before any constructor runs, so a spec with a graph
//! problem never has side effects. A build is all-or-nothing and single
//! pass: on failure nothing is returned and a new call starts from scratch.
//!
//! # Examples
//!
//! ```rust
//! use device_spinner::core::{Arguments, DynError};
//! use device_spinner::locator::Registry;
//! use device_spinner::resolver::Spinner;
//! use device_spinner::spec::SpecStore;
//! use std::sync::Arc;
//!
//! struct Wheel;
//! struct Bike {
//!     front: Arc<Wheel>,
//!     back: Arc<Wheel>,
//! }
//!
//! let mut registry = Registry::new();
//! registry
//!     .register("vehicles", "Wheel", |_: Arguments| -> Result<Wheel, DynError> { Ok(Wheel) })
//!     .register("vehicles", "Bike", |args: Arguments| -> Result<Bike, DynError> {
//!         Ok(Bike { front: args.instance(0)?, back: args.instance(1)? })
//!     });
//!
//! let specs = SpecStore::from_yaml_str(
//!     r#"
//! my_bike: {module: vehicles, class: Bike, args: [my_front_wheel, my_back_wheel]}
//! my_front_wheel: {module: vehicles, class: Wheel}
//! my_back_wheel: {module: vehicles, class: Wheel}
//! "#,
//! )?;
//!
//! let devices = Spinner::new(registry).build(&specs)?;
//! let bike = devices.get_as::<Bike>("my_bike").unwrap();
//! assert!(Arc::ptr_eq(&bike.front, &devices.get_arc::<Wheel>("my_front_wheel").unwrap()));
//! # Ok::<(), device_spinner::core::SpinnerError>(())
//! ```

pub mod dependency_graph;
pub mod instance_builder;
pub mod scanner;
pub mod scheduler;

pub use dependency_graph::DependencyGraph;
pub use instance_builder::{InstanceBuilder, Instances};
pub use scanner::{ScannedRecipe, Slot};
pub use scheduler::{BuildPlan, schedule};

use tracing::{debug, info_span};

use crate::core::Result;
use crate::locator::Locator;
use crate::spec::SpecStore;

/// Builds object graphs from spec stores using one locator.
///
/// A `Spinner` holds no per-build state; every [`build`] call gets its own
/// graph and instance cache, so one spinner can serve many builds,
/// concurrently if the locator allows.
///
/// [`build`]: Spinner::build
#[derive(Debug, Clone)]
pub struct Spinner<L> {
    locator: L,
}

impl<L: Locator> Spinner<L> {
    /// A spinner resolving targets through `locator`.
    pub fn new(locator: L) -> Self {
        Self {
            locator,
        }
    }

    /// The locator in use.
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Scan, graph and order `specs` without constructing anything.
    pub fn plan<'s>(&self, specs: &'s SpecStore) -> Result<BuildPlan<'s>> {
        schedule(specs)
    }

    /// Build every instance in `specs`.
    pub fn build(&self, specs: &SpecStore) -> Result<Instances> {
        build(specs, &self.locator)
    }
}

/// Build every instance in `specs`, resolving targets through `locator`.
///
/// Fails before constructing anything on a dangling reference or a cycle,
/// and at the failing instance on a lookup or construction error.
pub fn build<L: Locator + ?Sized>(specs: &SpecStore, locator: &L) -> Result<Instances> {
    let span = info_span!("build", instances = specs.len());
    let _guard = span.enter();

    let plan = schedule(specs)?;
    debug!("Scheduled {} instances", plan.len());

    let instances = InstanceBuilder::new(locator).run(plan)?;
    debug!("Built {} instances", instances.len());
    Ok(instances)
}
