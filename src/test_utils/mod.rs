//! Test utilities for device-spinner
//!
//! Available to this crate's unit tests and, through the `test-utils`
//! feature, to integration tests and demos:
//!
//! - [`devices`] - sample constructible types (vehicles, wheels, a lab
//!   bench) and registries that know them, plus a call-counting probe
//! - [`fixtures`] - YAML and TOML configuration documents
//! - [`environment`] - temporary directories for configuration tests
//!
//! # Example
//!
//! ```rust,no_run
//! use device_spinner::resolver::Spinner;
//! use device_spinner::spec::SpecStore;
//! use device_spinner::test_utils::{Bike, sample_registry};
//!
//! let specs = SpecStore::from_yaml_str(
//!     "bike: {module: vehicles, class: Bike, args: [w, w]}\nw: {module: vehicles, class: Wheel}",
//! )
//! .unwrap();
//! let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
//! assert!(devices.get_as::<Bike>("bike").is_some());
//! ```

pub mod devices;
pub mod environment;
pub mod fixtures;

pub use devices::{
    Bike, Camera, Hub, Laser, Microscope, Probe, ProbeCounter, Rim, Spoke, SpokedWheel, Wheel,
    instances_in, sample_registry,
};
pub use environment::TestEnvironment;
pub use fixtures::ConfigFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging based on RUST_LOG environment variable
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Without `level` and without `RUST_LOG`, nothing is installed.
///
/// ```bash
/// RUST_LOG=device_spinner=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
