//! Core schema types for the traffic baseline recorder.
//!
//! Defines the event and window value types that flow through the pipeline
//! (capture -> classify -> aggregate -> sink) and the CSV record format used
//! by the append-only baseline log.

pub mod event;
pub mod window;

pub use event::{ClassifiedEvent, Direction};
pub use window::{
    parse_csv_row, DirectionStats, LatencyStats, RecordError, Window, WindowRow, CSV_HEADER,
};
