//! device-spinner - build object graphs from declarative specs
//!
//! A spec is a mapping from instance name to a construction recipe: what to
//! construct (a module and a class or factory) and the arguments to pass. Any
//! top-level argument whose value is the name of another instance is a
//! reference: that instance is built first and passed in its place.
//!
//! ```yaml
//! devices:
//!   my_bike:
//!     module: vehicles
//!     class: Bike
//!     args: [my_front_wheel, my_back_wheel]
//!   my_front_wheel: {module: vehicles, class: Wheel}
//!   my_back_wheel: {module: vehicles, class: Wheel}
//! ```
//!
//! Building the spec above constructs both wheels (each exactly once), then
//! the bike with the two wheel instances as its arguments.
//!
//! # Architecture Overview
//!
//! - [`spec`] - [`Value`] trees, [`Recipe`]s and the [`SpecStore`]
//! - [`locator`] - the [`Locator`] trait mapping `module.symbol` to a
//!   constructible, and [`Registry`], the registration table implementing it
//! - [`resolver`] - scanning, dependency graph, build order and construction
//! - [`config`] - YAML/TOML configuration documents holding specs
//! - [`core`] - instances, arguments and errors
//! - [`constants`] - recipe keys and defaults
//!
//! # Resolution Rules
//!
//! - Only top-level values of `args` and `kwds` are matched against instance
//!   names. A list such as `[spoke0, spoke1]` is passed through as strings;
//!   use the `builtins.to_list` factory to build a list of instances.
//! - A value equal to the recipe's own name is never a reference.
//! - Positions listed in `skip_args` and keys listed in `skip_kwds` are never
//!   references.
//! - `{"$ref": name}` is an explicit reference; pointing it at a name with no
//!   recipe fails the build. A top-level mapping of exactly that shape can
//!   therefore not be passed as a literal; add a second key, or nest it in a
//!   list, to keep it plain data.
//! - Missing references and cycles are reported before anything is
//!   constructed. Any failure aborts the whole build.
//!
//! # Quick Start
//!
//! ```rust
//! use device_spinner::core::{Arguments, DynError};
//! use device_spinner::{Registry, SpecStore, Spinner};
//!
//! struct Laser {
//!     serial_port: String,
//! }
//!
//! let mut registry = Registry::with_builtins();
//! registry.register("lab", "Laser", |args: Arguments| -> Result<Laser, DynError> {
//!     Ok(Laser { serial_port: args.kwd_str("serial_port")?.to_string() })
//! });
//!
//! let specs = SpecStore::from_yaml_str("laser: {module: lab, class: Laser, kwds: {serial_port: COM3}}")?;
//! let devices = Spinner::new(registry).build(&specs)?;
//! assert_eq!(devices.get_as::<Laser>("laser").map(|l| l.serial_port.as_str()), Some("COM3"));
//! # Ok::<(), device_spinner::SpinnerError>(())
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Each
//! build runs in a `build` span; at `debug` level every construction is
//! logged as `name = module.symbol(args, key=value)`.

pub mod config;
pub mod constants;
pub mod core;
pub mod locator;
pub mod resolver;
pub mod spec;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use core::{Argument, Arguments, Instance, LookupError, SpinnerError};
pub use locator::{Locator, Registry};
pub use resolver::{BuildPlan, Instances, Spinner, build};
pub use spec::{Recipe, SpecStore, Target, Value};
