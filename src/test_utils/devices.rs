//! Sample constructible types and registries for tests and demos.
//!
//! Three small "device" families are registered under their own modules:
//!
//! - `vehicles`: [`Wheel`] and [`Bike`]
//! - `wheels`: [`Hub`], [`Rim`], [`Spoke`] and three wheel flavours taking
//!   their spokes as a list, as extra positionals, or as extra keywords
//! - `lab`: [`Laser`], [`Camera`] and [`Microscope`]
//!
//! plus `test.Probe`, a constructible that counts its calls (see
//! [`ProbeCounter`]).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{Argument, ArgumentError, Arguments, DynError};
use crate::locator::Registry;

/// A wheel with nothing on it.
#[derive(Debug, Default)]
pub struct Wheel;

/// A bike sharing nothing but its wheels.
#[derive(Debug)]
pub struct Bike {
    pub front: Arc<Wheel>,
    pub back: Arc<Wheel>,
}

#[derive(Debug, Default)]
pub struct Hub;

#[derive(Debug, Default)]
pub struct Rim;

#[derive(Debug, Default)]
pub struct Spoke;

/// A wheel built from a rim, a hub and its spokes.
///
/// Registered three times: `wheels.Wheel` takes the spokes as one list
/// instance (third positional), `wheels.WheelStarArgs` takes every
/// positional after the hub, and `wheels.WheelStarKwargs` every keyword.
#[derive(Debug)]
pub struct SpokedWheel {
    pub rim: Arc<Rim>,
    pub hub: Arc<Hub>,
    pub spokes: Vec<Arc<Spoke>>,
}

/// A laser on a serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Laser {
    pub serial_port: String,
}

#[derive(Debug, Default)]
pub struct Camera;

#[derive(Debug)]
pub struct Microscope {
    pub camera: Arc<Camera>,
    pub lasers: Vec<Arc<Laser>>,
}

/// What `test.Probe` builds: its call number and the arguments it got.
#[derive(Debug)]
pub struct Probe {
    /// 0 for the first probe constructed by a registry, 1 for the next, ...
    pub seq: usize,
    pub args: Arguments,
}

/// Shared call counter behind `test.Probe`.
#[derive(Debug, Clone, Default)]
pub struct ProbeCounter {
    calls: Arc<AtomicUsize>,
}

impl ProbeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of probes constructed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A registry with `test.Probe` bound to this counter.
    pub fn registry(&self) -> Registry {
        let calls = Arc::clone(&self.calls);
        let mut registry = Registry::with_builtins();
        registry.register("test", "Probe", move |args: Arguments| -> Result<Probe, DynError> {
            Ok(Probe {
                seq: calls.fetch_add(1, Ordering::SeqCst),
                args,
            })
        });
        registry
    }
}

/// Every sample family plus the builtins.
pub fn sample_registry() -> Registry {
    let mut registry = Registry::with_builtins();
    register_vehicles(&mut registry);
    register_wheels(&mut registry);
    register_lab(&mut registry);
    registry
}

/// `vehicles.Wheel` and `vehicles.Bike`.
pub fn register_vehicles(registry: &mut Registry) {
    registry
        .register("vehicles", "Wheel", |_: Arguments| -> Result<Wheel, DynError> { Ok(Wheel) })
        .register("vehicles", "Bike", |args: Arguments| -> Result<Bike, DynError> {
            Ok(Bike {
                front: args.instance(0)?,
                back: args.instance(1)?,
            })
        });
}

/// The `wheels` module.
pub fn register_wheels(registry: &mut Registry) {
    registry
        .register("wheels", "Hub", |_: Arguments| -> Result<Hub, DynError> { Ok(Hub) })
        .register("wheels", "Rim", |_: Arguments| -> Result<Rim, DynError> { Ok(Rim) })
        .register("wheels", "Spoke", |_: Arguments| -> Result<Spoke, DynError> { Ok(Spoke) })
        .register("wheels", "Wheel", |args: Arguments| -> Result<SpokedWheel, DynError> {
            let spokes = args.instance::<Vec<Argument>>(2)?;
            Ok(SpokedWheel {
                rim: args.instance(0)?,
                hub: args.instance(1)?,
                spokes: instances_in(&spokes)?,
            })
        })
        .register("wheels", "WheelStarArgs", |args: Arguments| -> Result<SpokedWheel, DynError> {
            Ok(SpokedWheel {
                rim: args.instance(0)?,
                hub: args.instance(1)?,
                spokes: instances_in(args.args.get(2..).unwrap_or_default())?,
            })
        })
        .register("wheels", "WheelStarKwargs", |args: Arguments| -> Result<SpokedWheel, DynError> {
            let spokes: Vec<Argument> = args.kwds.values().cloned().collect();
            Ok(SpokedWheel {
                rim: args.instance(0)?,
                hub: args.instance(1)?,
                spokes: instances_in(&spokes)?,
            })
        });
}

/// The `lab` module.
pub fn register_lab(registry: &mut Registry) {
    registry
        .register("lab", "Laser", |args: Arguments| -> Result<Laser, DynError> {
            let serial_port = match args.kwd_str("serial_port") {
                Ok(port) => port,
                Err(ArgumentError::MissingKeyword {
                    ..
                }) => args.str(0)?,
                Err(e) => return Err(e.into()),
            };
            Ok(Laser {
                serial_port: serial_port.to_string(),
            })
        })
        .register("lab", "Camera", |_: Arguments| -> Result<Camera, DynError> { Ok(Camera) })
        .register("lab", "Microscope", |args: Arguments| -> Result<Microscope, DynError> {
            let lasers = args.kwd_instance::<Vec<Argument>>("lasers")?;
            Ok(Microscope {
                camera: args.kwd_instance("camera")?,
                lasers: instances_in(&lasers)?,
            })
        });
}

/// Downcast every element of a list of arguments to `T`.
pub fn instances_in<T: std::any::Any + Send + Sync>(
    list: &[Argument],
) -> Result<Vec<Arc<T>>, ArgumentError> {
    list.iter()
        .map(|argument| match argument {
            Argument::Instance(instance) => instance.downcast::<T>(),
            Argument::Literal(value) => Err(ArgumentError::WrongType {
                expected: "an instance",
                actual: value.kind().to_string(),
            }),
        })
        .collect()
}
