//! Errors reported when a TAP run does not reconcile cleanly.

use thiserror::Error;

/// Terminal failure of a TAP read.
///
/// Every variant is final for the run; the partial report is still available
/// alongside it.
#[derive(Debug, Error)]
pub enum TapError {
    /// Neither a plan nor any result line was seen.
    #[error("no tests")]
    NoTests,

    /// The plan declared test numbers that never reported; holds the compact
    /// range rendering, e.g. `2, 4-5`.
    #[error("no result for {0}")]
    MissingResults(String),

    /// A result arrived beyond the planned maximum, or twice for one number.
    #[error("unexpected extra result for {0}")]
    UnexpectedExtraResult(u32),

    /// The test program printed `Bail out!`.
    #[error("testing aborted: {0}")]
    Aborted(String),

    /// The line source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
