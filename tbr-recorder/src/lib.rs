//! Traffic baseline recorder CLI.
//!
//! Wires the pipeline together: capture source -> classifier -> window
//! aggregator -> CSV sink, with signal-driven graceful shutdown and an
//! optional JSONL status side-channel.

pub mod cli;
pub mod exit;
pub mod io;
pub mod logger;
pub mod recorder;
pub mod signal;

pub use cli::{Cli, CliError};
pub use logger::{Logger, MockLogger, StderrLogger, Verbosity};
pub use recorder::{run_recorder, CommandError, RecorderConfig, RecorderReport};
pub use signal::{NeverShutdown, ShutdownCheck, ShutdownFlag};
