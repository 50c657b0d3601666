//! IPv4/TCP header extraction from raw captured packets.

use std::net::Ipv4Addr;

use etherparse::{NetSlice, SlicedPacket, TransportSlice};

/// A captured packet reduced to the header fields the pipeline needs.
///
/// Only IPv4/TCP packets become frames; anything else is discarded upstream
/// of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Source IPv4 address.
    pub src: Ipv4Addr,
    /// Destination IPv4 address.
    pub dst: Ipv4Addr,
    /// Original wire length in bytes (not the captured snap length).
    pub len: u32,
    /// Capture timestamp, Unix milliseconds.
    pub ts_ms: u64,
}

/// Parse an ethernet frame into a `Frame`, or None if it is not IPv4/TCP or
/// is truncated/malformed. Malformed input is a non-error by design: the
/// caller counts discards, nothing is raised.
pub fn parse_frame(data: &[u8], wire_len: u32, ts_ms: u64) -> Option<Frame> {
    let sliced = SlicedPacket::from_ethernet(data).ok()?;

    let (src, dst) = match sliced.net? {
        NetSlice::Ipv4(ipv4) => (
            ipv4.header().source_addr(),
            ipv4.header().destination_addr(),
        ),
        _ => return None,
    };

    match sliced.transport? {
        TransportSlice::Tcp(_) => {}
        _ => return None,
    }

    Some(Frame {
        src,
        dst,
        len: wire_len,
        ts_ms,
    })
}
