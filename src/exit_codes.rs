//! Exit code constants for the listings CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: Validation failure (one or more data checks failed)
//! - 3: Artifact store failure (unknown reference, storage I/O)
//! - 4: Data failure (malformed CSV, missing required columns)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Validation failure: at least one check in the suite failed.
pub const VALIDATION_FAILURE: i32 = 2;

/// Artifact failure: reference could not be resolved, stored, or downloaded.
pub const ARTIFACT_FAILURE: i32 = 3;

/// Data failure: the dataset could not be read or lacks required columns.
pub const DATA_FAILURE: i32 = 4;
