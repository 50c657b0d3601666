//! Packet capture and classification for the traffic baseline recorder.
//!
//! This crate provides:
//! - `FilterSpec`: the host + port capture filter, rendered as a BPF expression
//! - `Frame` and `parse_frame`: IPv4/TCP header extraction from raw packets
//! - `classify`: pure direction classification against the target address
//! - `PacketSource` trait with a live pcap implementation and a mock for tests

pub mod classify;
pub mod filter;
pub mod parse;
pub mod source;

pub use classify::classify;
pub use filter::FilterSpec;
pub use parse::{parse_frame, Frame};
pub use source::{CaptureError, MockPacketSource, PacketSource, PcapSource};
