//! Stable exit codes for the `tap` CLI.

/// Every planned test reported and none failed.
pub const OK: i32 = 0;
/// Command failed before a verdict: unreadable input, bad config, usage error.
pub const INVALID: i32 = 1;
/// Tests failed, results were missing or extra, or there were no tests.
pub const FAILED: i32 = 2;
/// The test program bailed out.
pub const ABORTED: i32 = 3;
