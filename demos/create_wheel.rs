//! Three ways to hand a list of spokes to a wheel.
//!
//! Lists inside `args` are never scanned for instance names, so the spokes
//! are either collected with `builtins.to_list` first, or passed one by one
//! as extra positional or keyword arguments.
//!
//! ```bash
//! RUST_LOG=device_spinner=debug cargo run --example create_wheel
//! ```

use std::sync::Arc;

use anyhow::Result;
use device_spinner::core::{Argument, Arguments, DynError};
use device_spinner::{Registry, SpecStore, Spinner};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Spoke;

#[derive(Debug)]
struct Hub;

#[derive(Debug)]
struct Rim;

#[derive(Debug)]
#[allow(dead_code)]
struct Wheel {
    rim: Arc<Rim>,
    hub: Arc<Hub>,
    spokes: Vec<Arc<Spoke>>,
}

const DEVICE_SPECS: &str = r#"
my_bike_wheel:
  module: create_wheel
  class: Wheel
  args: [rim_700mm, my_hub, spoke_list]
spoke_list:
  factory: device_spinner.builtins.to_list
  args: [spoke0, spoke1, spoke2, spoke3]
my_bike_wheel_star_args:
  module: create_wheel
  class: WheelStarArgs
  args: [rim_700mm, my_hub, spoke0, spoke1, spoke2, spoke3]
my_bike_wheel_star_kwargs:
  module: create_wheel
  class: WheelStarKwargs
  args: [rim_700mm, my_hub]
  kwds: {spokeA: spoke0, spokeB: spoke1, spokeC: spoke2, spokeD: spoke3}
rim_700mm: {module: create_wheel, class: Rim}
my_hub: {module: create_wheel, class: Hub}
spoke0: {module: create_wheel, class: Spoke}
spoke1: {module: create_wheel, class: Spoke}
spoke2: {module: create_wheel, class: Spoke}
spoke3: {module: create_wheel, class: Spoke}
"#;

fn spokes<'a>(arguments: impl IntoIterator<Item = &'a Argument>) -> Result<Vec<Arc<Spoke>>, DynError> {
    arguments
        .into_iter()
        .map(|argument| match argument.as_instance() {
            Some(instance) => Ok(instance.downcast::<Spoke>()?),
            None => Err(format!("expected a spoke, got {argument}").into()),
        })
        .collect()
}

fn wheel(args: &Arguments, spokes: Vec<Arc<Spoke>>) -> Result<Wheel, DynError> {
    Ok(Wheel {
        rim: args.instance(0)?,
        hub: args.instance(1)?,
        spokes,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut registry = Registry::with_builtins();
    registry
        .register("create_wheel", "Spoke", |_: Arguments| -> Result<Spoke, DynError> { Ok(Spoke) })
        .register("create_wheel", "Hub", |_: Arguments| -> Result<Hub, DynError> { Ok(Hub) })
        .register("create_wheel", "Rim", |_: Arguments| -> Result<Rim, DynError> { Ok(Rim) })
        .register("create_wheel", "Wheel", |args: Arguments| -> Result<Wheel, DynError> {
            let list = args.instance::<Vec<Argument>>(2)?;
            wheel(&args, spokes(list.iter())?)
        })
        .register("create_wheel", "WheelStarArgs", |args: Arguments| -> Result<Wheel, DynError> {
            wheel(&args, spokes(args.args.iter().skip(2))?)
        })
        .register("create_wheel", "WheelStarKwargs", |args: Arguments| -> Result<Wheel, DynError> {
            wheel(&args, spokes(args.kwds.values())?)
        });

    let specs = SpecStore::from_yaml_str(DEVICE_SPECS)?;
    let spinner = Spinner::new(registry);

    let plan = spinner.plan(&specs)?;
    println!("{}", plan.graph().to_tree_string("my_bike_wheel"));

    let devices = spinner.build(&specs)?;
    for name in ["my_bike_wheel", "my_bike_wheel_star_args", "my_bike_wheel_star_kwargs"] {
        if let Some(wheel) = devices.get_as::<Wheel>(name) {
            println!("{name}: {} spokes", wheel.spokes.len());
        }
    }
    Ok(())
}
