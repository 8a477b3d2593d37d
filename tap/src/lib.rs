//! Test Anything Protocol reader and writer.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure line grammar, result table, reconciliation and range
//!   rendering. No I/O, fully testable in isolation.
//! - **[`io`]**: The line source and sink boundaries, plus CLI configuration.
//!
//! [`reader`] drives the core from a line source as a pull cursor; [`writer`]
//! encodes reports back to TAP lines.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod reader;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod writer;

pub use crate::core::types::{Plan, Report, RunReport, TestResult};
pub use crate::error::TapError;
pub use crate::reader::{Advance, Reader, read};
pub use crate::writer::Writer;
