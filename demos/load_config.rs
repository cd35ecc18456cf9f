//! Load a microscope from a YAML configuration file, then save it as TOML.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example load_config --features test-utils
//! ```

use anyhow::Result;
use device_spinner::Spinner;
use device_spinner::config::Config;
use device_spinner::constants::DEFAULT_SPEC_SECTION;
use device_spinner::core::user_friendly_error;
use device_spinner::test_utils::{ConfigFixture, Microscope, sample_registry};
use tracing_subscriber::EnvFilter;

fn run() -> Result<()> {
    let workdir = tempfile::tempdir()?;
    let path = ConfigFixture::lab_yaml().write_to(workdir.path())?;

    let config = Config::open(&path)?;
    println!("{:#?}", config.get("metadata"));

    let specs = config.specs(DEFAULT_SPEC_SECTION)?;
    let devices = Spinner::new(sample_registry()).build(&specs)?;

    if let Some(microscope) = devices.get_as::<Microscope>("microscope") {
        for laser in &microscope.lasers {
            println!("laser on {}", laser.serial_port);
        }
    }

    let saved = config.save(Some(workdir.path().join("instrument_config.toml").as_path()), false)?;
    println!("{}", std::fs::read_to_string(saved)?);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(error) = run() {
        user_friendly_error(error).display();
        std::process::exit(1);
    }
}
