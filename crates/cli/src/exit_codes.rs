//! CLI Exit Code Registry
//!
//! Single source of truth for the `saldo` binary's exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | A required source file is missing                    |
//! | 4    | A source file exists but could not be parsed         |
//! | 5    | A report could not be written                        |
//! | 6    | Run config file is invalid                           |

/// Success - run completed and both reports were written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A required source is absent. Both sources are required and checked
/// before any parsing; nothing is allocated or written.
pub const EXIT_INPUT_MISSING: u8 = 3;

/// A source file exists but could not be opened or parsed as its format.
/// Individual malformed rows are NOT this - they are skipped and counted.
pub const EXIT_INPUT_PARSE: u8 = 4;

/// A report destination was unwritable. Fatal for that report only; a
/// report already written stays on disk.
pub const EXIT_REPORT_WRITE: u8 = 5;

/// The TOML run config failed to parse.
pub const EXIT_CONFIG_INVALID: u8 = 6;
