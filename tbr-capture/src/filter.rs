//! Capture filter specification.

use std::net::Ipv4Addr;

/// Host + port capture filter for the baseline recorder.
///
/// Rendered as a BPF expression of the form `host <addr> and tcp port <port>`
/// so the kernel drops everything else before it reaches the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Target address traffic is classified against.
    pub host: Ipv4Addr,
    /// TCP port to capture on.
    pub port: u16,
}

impl FilterSpec {
    pub fn new(host: Ipv4Addr, port: u16) -> Self {
        Self { host, port }
    }

    /// Render the BPF filter expression.
    pub fn expression(&self) -> String {
        format!("host {} and tcp port {}", self.host, self.port)
    }
}
