//! Injectable latency measurement.

use tbr_schema::ClassifiedEvent;

/// Produces an optional latency sample for each classified event.
///
/// What "latency" means is a policy choice: the default probe measures the
/// direction-agnostic inter-arrival gap. A matched command/response probe can
/// be slotted in through this trait without touching the aggregator.
pub trait LatencyProbe: Send {
    /// Observe one event; return a latency sample in milliseconds, or None
    /// when this event carries no sample (e.g. the first event of a run).
    fn observe(&mut self, event: &ClassifiedEvent) -> Option<f64>;
}

/// Inter-arrival gap from the previous event, any direction.
#[derive(Debug, Default)]
pub struct InterArrivalProbe {
    last_ts_ms: Option<u64>,
}

impl InterArrivalProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LatencyProbe for InterArrivalProbe {
    fn observe(&mut self, event: &ClassifiedEvent) -> Option<f64> {
        let gap = self
            .last_ts_ms
            .map(|prev| event.ts_ms.saturating_sub(prev) as f64);
        self.last_ts_ms = Some(event.ts_ms);
        gap
    }
}
