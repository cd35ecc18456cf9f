//! Constants shared across the device-spinner codebase.
//!
//! Recipe keys are the field names understood in a spec mapping. They are
//! defined centrally so the spec parser, the error messages and the test
//! fixtures all agree on the same spelling.

/// Module path of the constructible (`module: my.module`).
pub const MODULE_KEY: &str = "module";

/// Class name, or a dotted `module.Class` path when no module is given.
pub const CLASS_KEY: &str = "class";

/// Factory function name, or a dotted `module.function` path when no module is given.
pub const FACTORY_KEY: &str = "factory";

/// Positional arguments.
pub const ARGS_KEY: &str = "args";

/// Keyword arguments.
pub const KWDS_KEY: &str = "kwds";

/// Positional indices whose values must never be treated as references.
pub const SKIP_ARGS_KEY: &str = "skip_args";

/// Keyword names whose values must never be treated as references.
pub const SKIP_KWDS_KEY: &str = "skip_kwds";

/// Key of the single-entry mapping that marks an explicit reference (`{"$ref": name}`).
pub const REF_KEY: &str = "$ref";

/// Module name under which [`crate::locator::builtins`] registers its helpers.
pub const BUILTINS_MODULE: &str = "builtins";

/// Alternate module path for the builtin helpers, matching older spec files
/// that spell them `device_spinner.builtins.to_list`.
pub const BUILTINS_MODULE_QUALIFIED: &str = "device_spinner.builtins";

/// Section of a configuration document that holds the spec mapping.
pub const DEFAULT_SPEC_SECTION: &str = "devices";

/// Maximum Levenshtein distance, as a percentage of the target length, for
/// a name to be offered as a "did you mean" suggestion.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of suggestions attached to a single error.
pub const MAX_SUGGESTIONS: usize = 3;
