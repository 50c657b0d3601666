//! Classified event types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Traffic direction relative to the monitored target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Destination address is the target (command traffic toward it).
    Outbound,
    /// Source address is the target (telemetry traffic from it).
    Inbound,
}

impl Direction {
    /// Stable lowercase label used in CSV rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Inbound => "inbound",
        }
    }

    /// Parse the CSV label back into a direction.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "outbound" => Some(Direction::Outbound),
            "inbound" => Some(Direction::Inbound),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured packet reduced to the fields the aggregator needs.
///
/// Produced once by the classifier, consumed by the aggregator, never
/// retained past its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// Capture timestamp, Unix milliseconds.
    pub ts_ms: u64,
    /// Direction relative to the target address.
    pub direction: Direction,
    /// Wire length of the packet in bytes.
    pub len: u32,
}

impl ClassifiedEvent {
    pub fn new(ts_ms: u64, direction: Direction, len: u32) -> Self {
        Self {
            ts_ms,
            direction,
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_as_str() {
        assert_eq!(Direction::Outbound.as_str(), "outbound");
        assert_eq!(Direction::Inbound.as_str(), "inbound");
    }

    #[test]
    fn test_direction_from_str_roundtrip() {
        for dir in [Direction::Outbound, Direction::Inbound] {
            assert_eq!(Direction::from_str_opt(dir.as_str()), Some(dir));
        }
    }

    #[test]
    fn test_direction_from_str_rejects_unknown() {
        assert_eq!(Direction::from_str_opt("sideways"), None);
        assert_eq!(Direction::from_str_opt(""), None);
        assert_eq!(Direction::from_str_opt("OUTBOUND"), None);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(format!("{}", Direction::Outbound), "outbound");
        assert_eq!(format!("{}", Direction::Inbound), "inbound");
    }

    #[test]
    fn test_classified_event_new() {
        let event = ClassifiedEvent::new(1500, Direction::Inbound, 200);
        assert_eq!(event.ts_ms, 1500);
        assert_eq!(event.direction, Direction::Inbound);
        assert_eq!(event.len, 200);
    }

    #[test]
    fn test_classified_event_copy_semantics() {
        let event = ClassifiedEvent::new(1, Direction::Outbound, 10);
        let copy = event;
        assert_eq!(event, copy);
    }
}
