//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error; `diff` found differences  |
//! | 2       | Universal        | CLI usage error (bad args, bad date)     |
//! | 3-9     | recon            | Report input, config, output             |
//! | 10      | recon            | Current policy expired (opt-in)          |
//! | 40-49   | store            | Report store client codes                |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use dash_store_client::StoreError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unparseable `--today`.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Diff
// =============================================================================

/// Documents differ. Like `diff(1)`, exit 1 means "files differ."
pub const EXIT_DIFF_FOUND: u8 = 1;

// =============================================================================
// Recon (3-10)
// =============================================================================

/// Report or upload file unreadable, or not a JSON object.
pub const EXIT_RECON_INPUT: u8 = 3;

/// Recon config failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 4;

/// Cannot write output (JSON file, exported PDF).
pub const EXIT_RECON_OUTPUT: u8 = 5;

/// Current policy is expired and `--fail-on-expired` is set.
pub const EXIT_POLICY_EXPIRED: u8 = 10;

// =============================================================================
// Store (40-49) — report store client codes
// =============================================================================

/// Network error reaching the report store.
pub const EXIT_STORE_NETWORK: u8 = 40;

/// Report id does not exist (HTTP 404).
pub const EXIT_STORE_NOT_FOUND: u8 = 41;

/// Non-success HTTP status other than 404.
pub const EXIT_STORE_HTTP: u8 = 42;

/// Store answered `"ok": false`.
pub const EXIT_STORE_REJECTED: u8 = 43;

/// Response body could not be decoded.
pub const EXIT_STORE_PARSE: u8 = 44;

/// Local settings file is invalid or unreadable.
pub const EXIT_STORE_SETTINGS: u8 = 45;

/// Map a StoreError to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::Network(_) => EXIT_STORE_NETWORK,
        StoreError::NotFound(_) => EXIT_STORE_NOT_FOUND,
        StoreError::Http(..) => EXIT_STORE_HTTP,
        StoreError::Rejected(_) => EXIT_STORE_REJECTED,
        StoreError::Parse(_) => EXIT_STORE_PARSE,
        StoreError::Settings(_) => EXIT_STORE_SETTINGS,
        // Local file the client was asked to read or upload.
        StoreError::Io(_) => EXIT_RECON_INPUT,
    }
}
