//! Filesystem abstraction and durable sink for the traffic baseline recorder.
//!
//! `Filesystem` abstracts the handful of operations the sink needs so the
//! pipeline can be tested against an in-memory mock. `CsvSink` is the durable
//! append-only log writer: idempotent header, whole-record atomic appends.

pub mod sink;
pub mod writer;

pub use sink::CsvSink;
pub use writer::{Filesystem, MockFilesystem, RealFilesystem, SinkError};
