//! Build a bike and its two wheels from an inline spec.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example create_vehicle
//! ```

use std::sync::Arc;

use anyhow::Result;
use device_spinner::core::{Arguments, DynError};
use device_spinner::{Registry, SpecStore, Spinner};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Wheel;

#[derive(Debug)]
#[allow(dead_code)]
struct Bike {
    front_wheel: Arc<Wheel>,
    back_wheel: Arc<Wheel>,
}

const DEVICE_SPECS: &str = r#"
my_bike:
  module: create_vehicle
  class: Bike
  args: [my_front_wheel, my_back_wheel]
my_front_wheel:
  module: create_vehicle
  class: Wheel
my_back_wheel:
  module: create_vehicle
  class: Wheel
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut registry = Registry::new();
    registry
        .register("create_vehicle", "Wheel", |_: Arguments| -> Result<Wheel, DynError> {
            Ok(Wheel)
        })
        .register("create_vehicle", "Bike", |args: Arguments| -> Result<Bike, DynError> {
            Ok(Bike {
                front_wheel: args.instance(0)?,
                back_wheel: args.instance(1)?,
            })
        });

    let specs = SpecStore::from_yaml_str(DEVICE_SPECS)?;
    let devices = Spinner::new(registry).build(&specs)?;

    for (name, instance) in devices.iter() {
        println!("{name}: {}", instance.type_name());
    }
    if let Some(bike) = devices.get_as::<Bike>("my_bike") {
        println!("{bike:#?}");
    }
    Ok(())
}
