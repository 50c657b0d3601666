//! The capture-to-log pipeline.
//!
//! `run_recorder` owns the single-threaded loop: pull a frame from the
//! packet source, classify it against the target, route it into the window
//! aggregator, and commit closed windows through the bounded pending buffer
//! to the CSV sink. Every dependency comes in through a trait so the whole
//! pipeline runs against mocks in tests.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

use tbr_aggregate::{Aggregator, InterArrivalProbe, PendingWindows};
use tbr_capture::{classify, CaptureError, PacketSource};
use tbr_clock::Clock;
use tbr_fs::{CsvSink, Filesystem, SinkError};
use tbr_schema::Window;

use crate::cli::CliError;
use crate::io::{StatusLine, StatusWriter};
use crate::logger::Logger;
use crate::signal::ShutdownCheck;

/// Errors from running the recorder.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CliError),

    #[error("failed to start capture: {0}")]
    CaptureStart(CaptureError),

    #[error("capture failed: {0}")]
    CaptureRuntime(CaptureError),

    #[error("failed to open baseline log: {0}")]
    SinkOpen(#[from] SinkError),
}

/// Validated recorder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    pub target: Ipv4Addr,
    pub port: u16,
    pub log_path: PathBuf,
    pub window_ms: u64,
    pub buffer_windows: usize,
    pub status_path: Option<PathBuf>,
}

/// Counters summarizing a completed recorder run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecorderReport {
    /// IPv4/TCP frames pulled from the capture.
    pub frames: u64,
    /// Frames classified as target traffic.
    pub events: u64,
    /// Captured packets the parser rejected.
    pub discards: u64,
    /// Windows closed by the aggregator.
    pub windows_closed: u64,
    /// Windows durably appended to the baseline log.
    pub windows_written: u64,
    /// Windows lost to the drop-oldest policy.
    pub windows_dropped: u64,
    /// Windows still buffered when the run ended.
    pub windows_unflushed: u64,
}

/// Enqueue a closed window and push as much of the buffer as the sink will
/// take. Sink failures are absorbed here; the windows stay buffered.
fn commit_window<F: Filesystem, L: Logger>(
    window: Window,
    pending: &mut PendingWindows,
    sink: &CsvSink<F>,
    logger: &L,
    report: &mut RecorderReport,
) {
    report.windows_closed += 1;

    if let Some(evicted) = pending.push(window) {
        report.windows_dropped += 1;
        logger.info(&format!(
            "buffer full, dropped window [{}, {}) with {} events",
            evicted.start_ms,
            evicted.end_ms,
            evicted.event_count()
        ));
    }

    match pending.drain_with(|w| sink.append(w)) {
        Ok(written) => report.windows_written += written as u64,
        Err((written, e)) => {
            report.windows_written += written as u64;
            logger.info(&format!(
                "log append failed ({}), {} windows buffered",
                e,
                pending.len()
            ));
        }
    }
}

/// Run the recorder pipeline until shutdown or a capture failure.
///
/// The capture source must already be open; the baseline log is opened here,
/// so a fatal capture startup error never leaves a log file behind. On
/// shutdown the open window is flushed as a partial window (skipped when
/// empty) and the pending buffer is drained once more.
pub fn run_recorder<P, C, F, H, L>(
    config: &RecorderConfig,
    mut source: P,
    clock: &C,
    fs: F,
    shutdown: &H,
    logger: &L,
) -> Result<RecorderReport, CommandError>
where
    P: PacketSource,
    C: Clock,
    F: Filesystem + Clone,
    H: ShutdownCheck,
    L: Logger,
{
    let sink = CsvSink::open(fs.clone(), config.log_path.clone())?;
    let status_writer = config
        .status_path
        .clone()
        .map(|path| StatusWriter::new(fs.clone(), path));

    let mut aggregator = Aggregator::new(
        clock.now_unix_ms(),
        config.window_ms,
        InterArrivalProbe::new(),
    );
    let mut pending = PendingWindows::new(config.buffer_windows);
    let mut report = RecorderReport::default();

    logger.info(&format!(
        "recording {} tcp/{} into {}",
        config.target,
        config.port,
        config.log_path.display()
    ));

    while !shutdown.should_stop() {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => continue, // read timeout, poll shutdown again
            Err(e) => {
                // Best effort: persist what we have before dying
                let last = aggregator.flush_current();
                if last.event_count() > 0 {
                    commit_window(last, &mut pending, &sink, logger, &mut report);
                }
                if !pending.is_empty() {
                    logger.info(&format!(
                        "capture failed with {} windows unwritten",
                        pending.len()
                    ));
                }
                return Err(CommandError::CaptureRuntime(e));
            }
        };

        report.frames += 1;
        let event = match classify(&frame, config.target) {
            Some(event) => event,
            None => continue,
        };
        report.events += 1;

        if let Some(closed) = aggregator.ingest(event) {
            logger.debug(&format!(
                "window closed [{}, {}) with {} events",
                closed.start_ms,
                closed.end_ms,
                closed.event_count()
            ));
            commit_window(closed, &mut pending, &sink, logger, &mut report);

            if let Some(writer) = &status_writer {
                let status = StatusLine {
                    ts_ms: clock.now_unix_ms(),
                    windows_closed: report.windows_closed,
                    windows_written: report.windows_written,
                    windows_dropped: report.windows_dropped,
                    events: report.events,
                    discards: source.discards(),
                };
                if let Err(e) = writer.append(&status) {
                    logger.verbose(&format!("status write failed: {}", e));
                }
            }
        }
    }

    // Graceful shutdown: flush the partial window unless it is empty
    let last = aggregator.flush_current();
    if last.event_count() > 0 {
        commit_window(last, &mut pending, &sink, logger, &mut report);
    }

    report.discards = source.discards();
    report.windows_unflushed = pending.len() as u64;
    if report.windows_unflushed > 0 {
        logger.info(&format!(
            "{} windows could not be written before shutdown",
            report.windows_unflushed
        ));
    }

    Ok(report)
}
