//! CLI argument parsing for the `tbr` binary.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::recorder::RecorderConfig;

/// Default target address (the monitored device).
pub const DEFAULT_TARGET: &str = "192.168.0.244";

/// Default TCP port to capture on.
pub const DEFAULT_PORT: u16 = 9090;

/// Default baseline log path.
pub const DEFAULT_LOG_PATH: &str = "baseline_metrics_h0.csv";

/// Default aggregation window in seconds.
pub const DEFAULT_WINDOW_SEC: u64 = 10;

/// Default bound on windows buffered while the sink is failing.
pub const DEFAULT_BUFFER_WINDOWS: usize = 8;

/// Errors from CLI argument validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(u16),

    #[error("window-sec must be at least 1, got {0}")]
    InvalidWindowSec(u64),

    #[error("buffer must be at least 1, got {0}")]
    InvalidBuffer(usize),
}

/// Traffic baseline recorder - passive capture and windowed aggregation of
/// TCP traffic to and from a target device.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tbr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Target IPv4 address traffic is classified against.
    #[arg(short = 't', long, default_value = DEFAULT_TARGET)]
    pub target: Ipv4Addr,

    /// TCP port to capture on.
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Baseline log path (CSV, append-only).
    #[arg(short = 'l', long = "log", default_value = DEFAULT_LOG_PATH)]
    pub log_path: PathBuf,

    /// Aggregation window duration in seconds.
    #[arg(long, default_value_t = DEFAULT_WINDOW_SEC)]
    pub window_sec: u64,

    /// Maximum windows buffered in memory while the log is unwritable;
    /// overflow drops the oldest.
    #[arg(long = "buffer", default_value_t = DEFAULT_BUFFER_WINDOWS)]
    pub buffer_windows: usize,

    /// Network interface to capture on.
    /// If not specified, uses the default capture device.
    #[arg(short, long)]
    pub iface: Option<String>,

    /// Optional JSONL status file updated once per closed window.
    #[arg(long)]
    pub status: Option<PathBuf>,

    /// Increase verbosity (-v verbose, -vv debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.port == 0 {
            return Err(CliError::InvalidPort(self.port));
        }
        if self.window_sec == 0 {
            return Err(CliError::InvalidWindowSec(self.window_sec));
        }
        if self.buffer_windows == 0 {
            return Err(CliError::InvalidBuffer(self.buffer_windows));
        }
        Ok(())
    }

    /// Build the recorder configuration from validated arguments.
    pub fn recorder_config(&self) -> RecorderConfig {
        RecorderConfig {
            target: self.target,
            port: self.port,
            log_path: self.log_path.clone(),
            window_ms: self.window_sec * 1000,
            buffer_windows: self.buffer_windows,
            status_path: self.status.clone(),
        }
    }
}

/// Parse CLI arguments from an iterator (for tests).
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
