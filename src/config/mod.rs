//! File-backed configuration documents.
//!
//! A [`Config`] wraps one YAML or TOML document on disk. It can be loaded,
//! edited in memory, reloaded and saved (possibly in the other format), and
//! hands out the [`SpecStore`] kept under one of its sections, `devices` by
//! default:
//!
//! ```yaml
//! metadata:
//!   name: bench
//! devices:
//!   camera: {module: lab, class: Camera}
//!   laser0: {module: lab, class: Laser, kwds: {serial_port: COM3}}
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use device_spinner::config::Config;
//! use device_spinner::locator::Registry;
//! use device_spinner::resolver::Spinner;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::open("instrument_config.yaml")?;
//! let specs = config.specs(device_spinner::constants::DEFAULT_SPEC_SECTION)?;
//! let devices = Spinner::new(Registry::with_builtins()).build(&specs)?;
//! println!("built {} devices", devices.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Formats
//!
//! The extension picks the format for both reading and writing, so
//! `config.save(Some(Path::new("copy.toml")), true)` converts a YAML document
//! to TOML. Mapping keys are kept sorted; comments and key order of the
//! original file are not preserved. TOML cannot represent `null`, so saving a
//! document holding one as TOML fails.

mod parser;

pub use parser::{ConfigFormat, parse_config, write_config};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::SpinnerError;
use crate::spec::{SpecStore, Value};

/// A YAML or TOML configuration document and the file it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    path: PathBuf,
    document: Value,
}

impl Config {
    /// Load an existing configuration file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self {
            path: path.to_path_buf(),
            document: Value::Null,
        };
        config.load(path)?;
        Ok(config)
    }

    /// A new, unsaved document at `path` holding a copy of `template`.
    pub fn create(path: impl AsRef<Path>, template: &Value) -> Result<Self> {
        let path = path.as_ref();
        ConfigFormat::require(path)?;
        info!("Creating {} from template", path.display());

        let mut config = Self {
            path: path.to_path_buf(),
            document: Value::Null,
        };
        config.load_from_template(template);
        Ok(config)
    }

    /// Load `path` if it exists, otherwise create it from `template`.
    pub fn open_or_create(path: impl AsRef<Path>, template: &Value) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path, template)
        }
    }

    /// Replace the document with a copy of `template`, discarding what was loaded.
    pub fn load_from_template(&mut self, template: &Value) {
        self.document = template.clone();
    }

    /// Load the document from `path`, which becomes the current path.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SpinnerError::ConfigNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        info!("Loading {}", path.display());
        self.document = parse_config(path)?;
        self.path = path.to_path_buf();
        Ok(())
    }

    /// Re-read the document from the current path, dropping unsaved edits.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.path.clone();
        self.load(path)
    }

    /// Write the document and return where it went.
    ///
    /// Without `path` the current file is written. A directory `path` means
    /// the current file name inside that directory. The destination's
    /// extension picks the format. The current path is left unchanged.
    pub fn save(&self, path: Option<&Path>, overwrite: bool) -> Result<PathBuf> {
        let mut destination = path.map_or_else(|| self.path.clone(), Path::to_path_buf);
        if destination.is_dir() {
            destination.push(self.doc_name());
        }

        let format = ConfigFormat::require(&destination)?;
        if destination.exists() && !overwrite {
            return Err(SpinnerError::ConfigExists {
                path: destination,
            }
            .into());
        }

        write_config(&destination, &self.document, format)?;
        debug!("Saved {} config to {}", format, destination.display());
        Ok(destination)
    }

    /// The file this document was loaded from or will be saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current file name.
    pub fn doc_name(&self) -> &str {
        self.path.file_name().and_then(|name| name.to_str()).unwrap_or_default()
    }

    /// The format of the current file.
    pub fn format(&self) -> Option<ConfigFormat> {
        ConfigFormat::from_path(&self.path)
    }

    /// The whole document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The whole document, for editing before a [`save`](Self::save).
    pub fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    /// A top-level section of the document.
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.document.get(section)
    }

    /// The spec store kept under `section`.
    pub fn specs(&self, section: &str) -> Result<SpecStore> {
        let mapping = self.get(section).ok_or_else(|| SpinnerError::MissingConfigSection {
            section: section.to_string(),
        })?;

        SpecStore::from_value(mapping).with_context(|| {
            format!("Invalid '{section}' section in {}", self.path.display())
        })
    }
}
