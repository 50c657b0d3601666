//! Direction classification against the target address.

use std::net::Ipv4Addr;

use tbr_schema::{ClassifiedEvent, Direction};

use crate::parse::Frame;

/// Classify a frame's direction relative to the target address.
///
/// Pure function, no side effects. Returns None when neither endpoint is the
/// target (the frame slipped past the capture filter). `dst == target` is
/// checked first, so a frame with src == dst == target classifies as
/// Outbound.
pub fn classify(frame: &Frame, target: Ipv4Addr) -> Option<ClassifiedEvent> {
    let direction = if frame.dst == target {
        Direction::Outbound
    } else if frame.src == target {
        Direction::Inbound
    } else {
        return None;
    };

    Some(ClassifiedEvent::new(frame.ts_ms, direction, frame.len))
}
