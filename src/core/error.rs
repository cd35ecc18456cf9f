//! Error handling for device-spinner
//!
//! This module provides the error types of the crate and a user-friendly
//! rendering of them. Two principles drive the design:
//! 1. **Strongly-typed errors** so callers can match on the failure mode
//! 2. **Every failure names its instance** so a broken spec can be fixed
//!    without re-deriving the dependency graph by hand
//!
//! # Error Categories
//!
//! - **Graph problems** (detected before anything is constructed):
//!   [`SpinnerError::MissingDependency`], [`SpinnerError::CircularDependency`]
//! - **Construction problems** (abort the build at the failing instance):
//!   [`SpinnerError::Lookup`], [`SpinnerError::Construction`]
//! - **Spec problems**: [`SpinnerError::InvalidRecipe`]
//! - **Configuration files**: [`SpinnerError::ConfigNotFound`],
//!   [`SpinnerError::UnsupportedConfigFormat`], [`SpinnerError::ConfigExists`],
//!   [`SpinnerError::MissingConfigSection`] and the wrapped IO/YAML/TOML errors
//!
//! # Examples
//!
//! ```rust,no_run
//! use device_spinner::core::{SpinnerError, user_friendly_error};
//!
//! let error = SpinnerError::CircularDependency {
//!     cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error with a suggestion
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{MAX_SUGGESTIONS, SIMILARITY_THRESHOLD_PERCENT};

/// Error type returned by constructibles.
///
/// Constructors and factories are opaque to the resolver, so whatever they
/// fail with is carried as a boxed error and attached to
/// [`SpinnerError::Construction`] as its source.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to resolve a `(module, symbol)` pair to a constructible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No constructible was ever registered under this module.
    #[error("module '{module}' is not registered")]
    ModuleNotFound {
        /// The module path that was looked up
        module: String,
    },

    /// The module exists but has no constructible with this name.
    #[error("module '{module}' has no constructible named '{symbol}'{}", format_suggestions(suggestions))]
    SymbolNotFound {
        /// The module path that was looked up
        module: String,
        /// The class or factory name that was looked up
        symbol: String,
        /// Registered names in the same module that look similar
        suggestions: Vec<String>,
    },
}

/// The main error type for device-spinner operations.
///
/// Graph errors ([`MissingDependency`], [`CircularDependency`]) are raised
/// before any constructor runs. Construction errors ([`Lookup`],
/// [`Construction`]) abort the build at the instance that failed; the
/// instances built so far are dropped.
///
/// [`MissingDependency`]: SpinnerError::MissingDependency
/// [`CircularDependency`]: SpinnerError::CircularDependency
/// [`Lookup`]: SpinnerError::Lookup
/// [`Construction`]: SpinnerError::Construction
#[derive(Error, Debug)]
pub enum SpinnerError {
    /// A reference names an instance that has no spec.
    #[error("Instance '{required_by}' references '{name}', but no spec with that name exists{}", format_suggestions(suggestions))]
    MissingDependency {
        /// The referenced name that is missing from the spec store
        name: String,
        /// The instance whose arguments contain the reference
        required_by: String,
        /// Known instance names that look similar to `name`
        suggestions: Vec<String>,
    },

    /// The dependency graph contains a cycle.
    ///
    /// `cycle` lists the full path with the first name repeated at the end,
    /// e.g. `["a", "b", "a"]`.
    #[error("Circular dependency detected: {}", cycle.join(" → "))]
    CircularDependency {
        /// The names forming the cycle, closing name repeated
        cycle: Vec<String>,
    },

    /// The locator could not resolve the instance's target.
    #[error("Failed to locate '{target}' for instance '{instance}'")]
    Lookup {
        /// The instance being built
        instance: String,
        /// The `module.symbol` path that was looked up
        target: String,
        /// The locator's failure
        #[source]
        source: LookupError,
    },

    /// The constructor or factory itself failed.
    #[error("Failed to construct instance '{instance}' with '{target}'")]
    Construction {
        /// The instance being built
        instance: String,
        /// The `module.symbol` path that was invoked
        target: String,
        /// The error returned by the constructible
        #[source]
        source: DynError,
    },

    /// A spec entry could not be turned into a recipe.
    #[error("Invalid recipe for instance '{instance}': {reason}")]
    InvalidRecipe {
        /// The instance whose spec entry is malformed
        instance: String,
        /// What is wrong with it
        reason: String,
    },

    /// A configuration file to load does not exist.
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// The path that was looked up
        path: PathBuf,
    },

    /// A configuration file has an extension other than `.yaml`, `.yml` or `.toml`.
    #[error("Unsupported configuration format for '{}': expected a .yaml, .yml or .toml file", path.display())]
    UnsupportedConfigFormat {
        /// The offending path
        path: PathBuf,
    },

    /// Saving would replace an existing file and overwriting was not allowed.
    #[error("Configuration file already exists: {}", path.display())]
    ConfigExists {
        /// The destination that already exists
        path: PathBuf,
    },

    /// A configuration document lacks the requested section.
    #[error("Configuration has no '{section}' section")]
    MissingConfigSection {
        /// The section that was requested
        section: String,
    },

    /// IO error from the standard library
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Any other error, used when converting foreign errors for display
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl SpinnerError {
    /// The instance this error is attributed to, if any.
    ///
    /// For a missing dependency this is the instance holding the dangling
    /// reference; for a cycle it is the first name of the cycle.
    pub fn instance(&self) -> Option<&str> {
        match self {
            Self::MissingDependency {
                required_by,
                ..
            } => Some(required_by),
            Self::CircularDependency {
                cycle,
            } => cycle.first().map(String::as_str),
            Self::Lookup {
                instance,
                ..
            }
            | Self::Construction {
                instance,
                ..
            }
            | Self::InvalidRecipe {
                instance,
                ..
            } => Some(instance),
            _ => None,
        }
    }

    /// Whether this error was raised while validating the dependency graph,
    /// i.e. before any constructor ran.
    pub fn is_graph_error(&self) -> bool {
        matches!(self, Self::MissingDependency { .. } | Self::CircularDependency { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
        format!(" (did you mean {}?)", quoted.join(", "))
    }
}

/// Find candidates that are close to `target` by Levenshtein distance.
///
/// Returns at most [`MAX_SUGGESTIONS`] names, closest first, and only those
/// within [`SIMILARITY_THRESHOLD_PERCENT`] of the target's length.
pub(crate) fn similar_names<'a, I>(target: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let max_distance = (target.chars().count() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (strsim::levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();

    scored.sort();
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, name)| name.to_string()).collect()
}

/// A [`SpinnerError`] plus user-facing guidance.
///
/// Suggestions are actionable steps; details explain what the error means.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SpinnerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: SpinnerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// The error is red and bold, details yellow, the suggestion green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Convert any error into an [`ErrorContext`] with suggestions.
///
/// [`SpinnerError`]s anywhere in the `anyhow` chain get tailored guidance;
/// everything else is wrapped as [`SpinnerError::Other`] with the full
/// context chain as its message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");
    match error.downcast::<SpinnerError>() {
        Ok(spinner_error) => create_error_context(spinner_error),
        Err(other) => {
            let permission_denied = other
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_error| io_error.kind() == std::io::ErrorKind::PermissionDenied);
            let ctx = ErrorContext::new(SpinnerError::Other {
                message,
            });
            if permission_denied {
                ctx.with_suggestion("Check the permissions of the configuration file and its directory")
            } else {
                ctx
            }
        }
    }
}

fn create_error_context(error: SpinnerError) -> ErrorContext {
    match &error {
        SpinnerError::MissingDependency {
            name,
            required_by,
            suggestions,
        } => {
            let suggestion = match suggestions.first() {
                Some(closest) => format!("Did you mean '{closest}'? Fix the reference in '{required_by}'"),
                None => format!("Add a spec named '{name}', or fix the reference in '{required_by}'"),
            };
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("Explicit references must name another instance in the same spec")
        }
        SpinnerError::CircularDependency {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Remove one reference from the cycle, or list the argument in skip_args/skip_kwds if it is meant as a plain string",
            )
            .with_details("Any string argument equal to another instance name is treated as a reference to it"),
        SpinnerError::Lookup {
            source,
            ..
        } => {
            let suggestion = match source {
                LookupError::ModuleNotFound {
                    ..
                } => "Register the module's constructibles in the Registry passed to the build",
                LookupError::SymbolNotFound {
                    ..
                } => "Check the spelling of 'class'/'factory' or register the missing constructible",
            };
            let details = source.to_string();
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }
        SpinnerError::Construction {
            source,
            ..
        } => {
            let details = format!("{source} (no instances were kept)");
            ErrorContext::new(error).with_details(details)
        }
        SpinnerError::InvalidRecipe {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Each spec needs 'module' + 'class'/'factory', or a dotted 'class'/'factory' path",
        ),
        SpinnerError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the path, or create the file from a template with Config::create"),
        SpinnerError::UnsupportedConfigFormat {
            ..
        } => ErrorContext::new(error).with_suggestion("Rename the file to use a .yaml or .toml suffix"),
        SpinnerError::ConfigExists {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Save to a different path or allow overwriting"),
        SpinnerError::Yaml(_) | SpinnerError::TomlDe(_) => ErrorContext::new(error)
            .with_suggestion("Check the file syntax: quotes, brackets and indentation"),
        _ => ErrorContext::new(error),
    }
}
