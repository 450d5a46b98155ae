//! Output side of the `voucher` binary.
//!
//! The generation engine hands its finished codes to a [`ResultSink`],
//! which owns formatting and persistence.

pub mod sink;

pub use sink::{FileSink, OutputFormat, ResultSink, SinkError};
