//! Core types for device-spinner
//!
//! This module holds the types every other module speaks in:
//!
//! - [`error`] - [`SpinnerError`], [`LookupError`], [`ErrorContext`] and
//!   [`user_friendly_error`] for colored, actionable error output
//! - [`instance`] - [`Instance`] (a type-erased, shared constructed object)
//!   and [`Arguments`] (what a constructible receives)
//!
//! # Examples
//!
//! ```rust
//! use device_spinner::core::{Argument, Arguments, Instance};
//! use device_spinner::spec::Value;
//!
//! let camera = Instance::new(String::from("camera"));
//! let args = Arguments::new(
//!     vec![Argument::Instance(camera.clone()), Argument::Literal(Value::from(2))],
//!     Default::default(),
//! );
//! assert!(args.arg(0).unwrap().as_instance().unwrap().ptr_eq(&camera));
//! assert_eq!(args.int(1).unwrap(), 2);
//! ```

pub mod error;
pub mod instance;

pub use error::{DynError, ErrorContext, LookupError, SpinnerError, user_friendly_error};
pub use instance::{Argument, ArgumentError, Arguments, Instance};

/// Result alias used throughout the crate.
pub type Result<T, E = SpinnerError> = std::result::Result<T, E>;
