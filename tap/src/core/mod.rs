//! Deterministic, pure TAP logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! lines and reports and return deterministic outputs suitable for tests.

pub mod grammar;
pub mod ranges;
pub mod reconcile;
pub mod summary;
pub mod table;
pub mod types;
