//! Window accumulators and the CSV record format.
//!
//! A `Window` is a fixed-duration time bucket owned by the aggregator while
//! open. Once closed it is immutable and serialized as two CSV rows, one per
//! direction. Timestamps are Unix milliseconds so the log round-trips without
//! precision loss; latency columns are milliseconds with three decimals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Direction;

/// Header row of the baseline log, written exactly once per file.
pub const CSV_HEADER: &str = "window_start,window_end,direction,packet_count,total_bytes,latency_min_ms,latency_max_ms,latency_mean_ms";

/// Latency accumulator for one direction within one window.
///
/// Mean is derived as `sum_ms / samples`; a direction with no samples renders
/// all three latency columns as `0.000`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatencyStats {
    pub min_ms: f64,
    pub max_ms: f64,
    pub sum_ms: f64,
    pub samples: u64,
}

impl LatencyStats {
    /// Fold one latency sample into the accumulator.
    pub fn observe(&mut self, latency_ms: f64) {
        if self.samples == 0 || latency_ms < self.min_ms {
            self.min_ms = latency_ms;
        }
        if self.samples == 0 || latency_ms > self.max_ms {
            self.max_ms = latency_ms;
        }
        self.sum_ms += latency_ms;
        self.samples += 1;
    }

    /// Mean latency, or 0.0 when no samples were observed.
    pub fn mean_ms(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.sum_ms / self.samples as f64
        }
    }
}

/// Per-direction counters within one window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionStats {
    pub count: u64,
    pub total_bytes: u64,
    pub latency: LatencyStats,
}

impl DirectionStats {
    /// Fold one packet into the counters. `latency_ms` is None when the
    /// latency probe has no sample for this packet (e.g. first event).
    pub fn observe(&mut self, len: u32, latency_ms: Option<f64>) {
        self.count += 1;
        self.total_bytes += len as u64;
        if let Some(latency) = latency_ms {
            self.latency.observe(latency);
        }
    }
}

/// A fixed-duration aggregation bucket covering `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub start_ms: u64,
    pub end_ms: u64,
    pub outbound: DirectionStats,
    pub inbound: DirectionStats,
}

impl Window {
    /// Create an empty window covering `[start_ms, end_ms)`.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self {
            start_ms,
            end_ms,
            outbound: DirectionStats::default(),
            inbound: DirectionStats::default(),
        }
    }

    /// Fold one classified packet into the window.
    pub fn record(&mut self, direction: Direction, len: u32, latency_ms: Option<f64>) {
        match direction {
            Direction::Outbound => self.outbound.observe(len, latency_ms),
            Direction::Inbound => self.inbound.observe(len, latency_ms),
        }
    }

    /// Whether `ts_ms` falls within `[start_ms, end_ms)`.
    pub fn contains(&self, ts_ms: u64) -> bool {
        ts_ms >= self.start_ms && ts_ms < self.end_ms
    }

    /// Total packets across both directions.
    pub fn event_count(&self) -> u64 {
        self.outbound.count + self.inbound.count
    }

    /// Stats for one direction.
    pub fn stats(&self, direction: Direction) -> &DirectionStats {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Inbound => &self.inbound,
        }
    }

    /// Serialize the closed window as CSV rows, one per direction, each
    /// terminated by LF. Both directions are always present so every window
    /// contributes exactly two rows.
    pub fn to_csv_rows(&self) -> String {
        let mut out = String::with_capacity(128);
        for direction in [Direction::Outbound, Direction::Inbound] {
            let stats = self.stats(direction);
            out.push_str(&format!(
                "{},{},{},{},{},{:.3},{:.3},{:.3}\n",
                self.start_ms,
                self.end_ms,
                direction,
                stats.count,
                stats.total_bytes,
                stats.latency.min_ms,
                stats.latency.max_ms,
                stats.latency.mean_ms(),
            ));
        }
        out
    }
}

/// One parsed CSV data row of the baseline log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRow {
    pub window_start: u64,
    pub window_end: u64,
    pub direction: Direction,
    pub packet_count: u64,
    pub total_bytes: u64,
    pub latency_min_ms: f64,
    pub latency_max_ms: f64,
    pub latency_mean_ms: f64,
}

/// Errors from parsing baseline log rows.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("expected 8 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid direction: {0}")]
    Direction(String),

    #[error("invalid numeric field {field}: {value}")]
    Numeric { field: &'static str, value: String },
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, RecordError> {
    value.parse().map_err(|_| RecordError::Numeric {
        field,
        value: value.to_string(),
    })
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value.parse().map_err(|_| RecordError::Numeric {
        field,
        value: value.to_string(),
    })
}

/// Parse one data row of the baseline log.
pub fn parse_csv_row(line: &str) -> Result<WindowRow, RecordError> {
    let fields: Vec<&str> = line.trim_end_matches('\n').split(',').collect();
    if fields.len() != 8 {
        return Err(RecordError::FieldCount(fields.len()));
    }

    let direction = Direction::from_str_opt(fields[2])
        .ok_or_else(|| RecordError::Direction(fields[2].to_string()))?;

    Ok(WindowRow {
        window_start: parse_u64("window_start", fields[0])?,
        window_end: parse_u64("window_end", fields[1])?,
        direction,
        packet_count: parse_u64("packet_count", fields[3])?,
        total_bytes: parse_u64("total_bytes", fields[4])?,
        latency_min_ms: parse_f64("latency_min_ms", fields[5])?,
        latency_max_ms: parse_f64("latency_max_ms", fields[6])?,
        latency_mean_ms: parse_f64("latency_mean_ms", fields[7])?,
    })
}
