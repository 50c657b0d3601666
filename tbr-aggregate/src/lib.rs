//! Window aggregation for the traffic baseline recorder.
//!
//! The aggregator routes classified events into fixed-duration windows whose
//! boundaries are a deterministic function of the pipeline start time, closes
//! windows as event timestamps cross boundaries, and measures latency through
//! an injectable probe. `PendingWindows` implements the bounded drop-oldest
//! buffer that decouples window closure from sink availability.

pub mod aggregator;
pub mod latency;
pub mod pending;

pub use aggregator::Aggregator;
pub use latency::{InterArrivalProbe, LatencyProbe};
pub use pending::PendingWindows;
