//! Packet source abstraction.
//!
//! `PacketSource` yields a lazy, infinite, non-restartable sequence of parsed
//! frames. The live implementation wraps a pcap capture handle; permission,
//! interface, and filter errors surface at open time, before any frame is
//! yielded. A mock implementation drives the pipeline in tests.

use std::collections::VecDeque;

use pcap::{Active, Capture, Device};
use thiserror::Error;

use crate::filter::FilterSpec;
use crate::parse::{parse_frame, Frame};

/// Errors from capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No capture device could be found.
    #[error("no capture device available")]
    NoDevice,

    /// Opening the capture handle failed (missing privilege, bad interface).
    #[error("failed to open capture on '{interface}': {reason}")]
    Open { interface: String, reason: String },

    /// The BPF filter expression was rejected.
    #[error("invalid capture filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    /// The capture handle died mid-run.
    #[error("capture read failed: {0}")]
    Read(String),
}

/// Source of captured frames.
///
/// `Ok(None)` means the read timed out with no packet, giving the caller a
/// chance to poll its shutdown flag. The sequence cannot be rewound.
pub trait PacketSource: Send {
    /// Block (up to the read timeout) for the next IPv4/TCP frame.
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Packets seen by the capture that did not parse as IPv4/TCP.
    fn discards(&self) -> u64 {
        0
    }
}

/// Live packet source backed by libpcap.
pub struct PcapSource {
    capture: Capture<Active>,
    discards: u64,
}

/// Read timeout so the capture loop can observe shutdown between packets.
const READ_TIMEOUT_MS: i32 = 500;

/// Headers only; wire length comes from the capture header.
const SNAPLEN: i32 = 96;

impl PcapSource {
    /// Open a live capture matching `filter` on `iface`, or on the default
    /// device when `iface` is None.
    ///
    /// All failure modes here are fatal startup conditions: missing
    /// privilege, unknown interface, rejected filter.
    pub fn open(filter: &FilterSpec, iface: Option<&str>) -> Result<Self, CaptureError> {
        let device = match iface {
            Some(name) => Device::from(name),
            None => Device::lookup()
                .map_err(|e| CaptureError::Read(e.to_string()))?
                .ok_or(CaptureError::NoDevice)?,
        };
        let device_name = device.name.clone();

        let mut capture = Capture::from_device(device)
            .and_then(|c| {
                c.promisc(false)
                    .snaplen(SNAPLEN)
                    .timeout(READ_TIMEOUT_MS)
                    .immediate_mode(true)
                    .open()
            })
            .map_err(|e| CaptureError::Open {
                interface: device_name.clone(),
                reason: e.to_string(),
            })?;

        let expression = filter.expression();
        capture
            .filter(&expression, true)
            .map_err(|e| CaptureError::Filter {
                filter: expression,
                reason: e.to_string(),
            })?;

        Ok(Self {
            capture,
            discards: 0,
        })
    }
}

impl PacketSource for PcapSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        match self.capture.next_packet() {
            Ok(packet) => {
                let header = packet.header;
                let ts_ms =
                    header.ts.tv_sec as u64 * 1000 + header.ts.tv_usec as u64 / 1000;
                match parse_frame(packet.data, header.len, ts_ms) {
                    Some(frame) => Ok(Some(frame)),
                    None => {
                        self.discards += 1;
                        Ok(None)
                    }
                }
            }
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(e) => Err(CaptureError::Read(e.to_string())),
        }
    }

    fn discards(&self) -> u64 {
        self.discards
    }
}

/// Mock packet source for testing.
///
/// Yields a scripted sequence of frames and idle (timeout) ticks, then
/// either reports idle forever or fails, depending on configuration.
#[derive(Debug, Default)]
pub struct MockPacketSource {
    steps: VecDeque<Option<Frame>>,
    fail_when_empty: bool,
    discards: u64,
}

impl MockPacketSource {
    /// Create an empty mock source that reports idle forever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame to be yielded.
    pub fn push_frame(&mut self, frame: Frame) {
        self.steps.push_back(Some(frame));
    }

    /// Queue an idle (read timeout) tick.
    pub fn push_idle(&mut self) {
        self.steps.push_back(None);
    }

    /// Fail with a read error once the scripted sequence is exhausted,
    /// simulating a capture handle dying mid-run.
    pub fn fail_when_empty(&mut self) {
        self.fail_when_empty = true;
    }

    /// Set the reported discard counter.
    pub fn set_discards(&mut self, discards: u64) {
        self.discards = discards;
    }
}

impl PacketSource for MockPacketSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        match self.steps.pop_front() {
            Some(step) => Ok(step),
            None if self.fail_when_empty => {
                Err(CaptureError::Read("capture handle closed".to_string()))
            }
            None => Ok(None),
        }
    }

    fn discards(&self) -> u64 {
        self.discards
    }
}
