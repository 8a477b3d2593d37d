//! Line-level I/O boundaries for the reader and writer.

pub mod config;
pub mod sink;
pub mod source;
