//! Configuration file fixtures
//!
//! Sample YAML and TOML documents with a `devices` section, built against
//! the constructibles in [`super::devices`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A named configuration document and the extension it is written with.
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub name: String,
    pub extension: String,
    pub content: String,
}

impl ConfigFixture {
    fn new(name: &str, extension: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            extension: extension.to_string(),
            content: content.trim_start().to_string(),
        }
    }

    /// A microscope with one camera and two lasers, in YAML.
    pub fn lab_yaml() -> Self {
        Self::new(
            "instrument_config",
            "yaml",
            r#"
metadata:
  name: bench
  revision: 2

devices:
  camera:
    module: lab
    class: Camera
  laser0:
    module: lab
    class: Laser
    kwds:
      serial_port: COM3
  laser1:
    module: lab
    class: Laser
    args: [COM4]
  lasers:
    factory: builtins.to_list
    args: [laser0, laser1]
  microscope:
    module: lab
    class: Microscope
    kwds:
      camera: camera
      lasers: lasers
"#,
        )
    }

    /// The same microscope as [`lab_yaml`](Self::lab_yaml), in TOML.
    pub fn lab_toml() -> Self {
        Self::new(
            "instrument_config",
            "toml",
            r#"
[metadata]
name = "bench"
revision = 2

[devices.camera]
module = "lab"
class = "Camera"

[devices.laser0]
module = "lab"
class = "Laser"
kwds = { serial_port = "COM3" }

[devices.laser1]
module = "lab"
class = "Laser"
args = ["COM4"]

[devices.lasers]
factory = "builtins.to_list"
args = ["laser0", "laser1"]

[devices.microscope]
module = "lab"
class = "Microscope"
kwds = { camera = "camera", lasers = "lasers" }
"#,
        )
    }

    /// A bike and its two wheels, using dotted class paths.
    pub fn vehicles_yaml() -> Self {
        Self::new(
            "sample_config",
            "yaml",
            r#"
devices:
  my_bike:
    class: vehicles.Bike
    args: [my_front_wheel, my_back_wheel]
  my_front_wheel:
    class: vehicles.Wheel
  my_back_wheel:
    class: vehicles.Wheel
"#,
        )
    }

    /// A document with no `devices` section.
    pub fn without_devices() -> Self {
        Self::new(
            "empty_config",
            "yaml",
            r#"
metadata:
  name: nothing here
"#,
        )
    }

    /// YAML that does not parse.
    pub fn invalid_syntax() -> Self {
        Self::new(
            "broken_config",
            "yaml",
            r#"
devices:
  camera: {module: lab, class: Camera
"#,
        )
    }

    /// File name this fixture is written as.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// Write the fixture into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write fixture {}", path.display()))?;
        Ok(path)
    }
}
