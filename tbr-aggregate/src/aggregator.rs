//! Event-to-window routing with deterministic boundaries.

use std::mem;

use tbr_schema::{ClassifiedEvent, Window};

use crate::latency::LatencyProbe;

/// Routes classified events into fixed-duration windows.
///
/// Window `i` covers `[origin + i*D, origin + (i+1)*D)` where `origin` is the
/// pipeline start time and `D` the configured duration, so boundaries depend
/// only on configuration, never on event arrival. Exactly one window is open
/// at a time; closing and opening happen only when an event timestamp crosses
/// the current boundary, so idle gaps produce no empty windows.
#[derive(Debug)]
pub struct Aggregator<P: LatencyProbe> {
    origin_ms: u64,
    window_ms: u64,
    current: Window,
    probe: P,
}

impl<P: LatencyProbe> Aggregator<P> {
    /// Create an aggregator with its first window starting at `origin_ms`.
    ///
    /// `window_ms` must be non-zero; the CLI validates this before
    /// construction.
    pub fn new(origin_ms: u64, window_ms: u64, probe: P) -> Self {
        assert!(window_ms > 0, "window duration must be non-zero");
        Self {
            origin_ms,
            window_ms,
            current: Window::new(origin_ms, origin_ms + window_ms),
            probe,
        }
    }

    /// Boundaries of the window covering `ts_ms`.
    fn bounds_for(&self, ts_ms: u64) -> (u64, u64) {
        let index = ts_ms.saturating_sub(self.origin_ms) / self.window_ms;
        let start = self.origin_ms + index * self.window_ms;
        (start, start + self.window_ms)
    }

    /// The currently open window.
    pub fn current(&self) -> &Window {
        &self.current
    }

    /// Ingest one event.
    ///
    /// Returns the closed window when the event's timestamp falls past the
    /// current boundary; the event itself always lands in the window covering
    /// its timestamp. Events older than the open window's start are clamped
    /// into it rather than reopening closed windows.
    pub fn ingest(&mut self, event: ClassifiedEvent) -> Option<Window> {
        let closed = if event.ts_ms >= self.current.end_ms {
            let (start, end) = self.bounds_for(event.ts_ms);
            Some(mem::replace(&mut self.current, Window::new(start, end)))
        } else {
            None
        };

        let latency_ms = self.probe.observe(&event);
        self.current.record(event.direction, event.len, latency_ms);

        closed
    }

    /// Force the open window closed regardless of time remaining.
    ///
    /// Used on shutdown to emit the final partial window. The emitted window
    /// keeps its nominal deterministic end boundary. The next consecutive
    /// window is opened in case the pipeline keeps running.
    pub fn flush_current(&mut self) -> Window {
        let next_start = self.current.end_ms;
        mem::replace(
            &mut self.current,
            Window::new(next_start, next_start + self.window_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::InterArrivalProbe;
    use tbr_schema::Direction;

    fn event(ts_ms: u64, direction: Direction, len: u32) -> ClassifiedEvent {
        ClassifiedEvent::new(ts_ms, direction, len)
    }

    fn aggregator(origin_ms: u64, window_ms: u64) -> Aggregator<InterArrivalProbe> {
        Aggregator::new(origin_ms, window_ms, InterArrivalProbe::new())
    }

    #[test]
    fn test_first_window_starts_at_origin() {
        let agg = aggregator(5000, 1000);
        assert_eq!(agg.current().start_ms, 5000);
        assert_eq!(agg.current().end_ms, 6000);
    }

    #[test]
    fn test_ingest_within_window_closes_nothing() {
        let mut agg = aggregator(0, 1000);
        assert!(agg.ingest(event(100, Direction::Outbound, 50)).is_none());
        assert!(agg.ingest(event(999, Direction::Inbound, 60)).is_none());
        assert_eq!(agg.current().event_count(), 2);
    }

    #[test]
    fn test_boundary_crossing_closes_window() {
        let mut agg = aggregator(0, 1000);
        agg.ingest(event(100, Direction::Outbound, 50));

        let closed = agg.ingest(event(1000, Direction::Outbound, 70)).expect("closed");
        assert_eq!(closed.start_ms, 0);
        assert_eq!(closed.end_ms, 1000);
        assert_eq!(closed.outbound.count, 1);

        // The boundary event landed in the new window
        assert_eq!(agg.current().start_ms, 1000);
        assert_eq!(agg.current().outbound.count, 1);
    }

    #[test]
    fn test_three_events_split_across_two_windows() {
        // (t=0, OUT, 100), (t=0.5s, IN, 200), (t=1.2s, OUT, 50) with D=1s
        let mut agg = aggregator(0, 1000);

        assert!(agg.ingest(event(0, Direction::Outbound, 100)).is_none());
        assert!(agg.ingest(event(500, Direction::Inbound, 200)).is_none());

        let closed = agg.ingest(event(1200, Direction::Outbound, 50)).expect("closed");
        assert_eq!((closed.start_ms, closed.end_ms), (0, 1000));
        assert_eq!(closed.outbound.count, 1);
        assert_eq!(closed.outbound.total_bytes, 100);
        assert_eq!(closed.inbound.count, 1);
        assert_eq!(closed.inbound.total_bytes, 200);

        assert_eq!((agg.current().start_ms, agg.current().end_ms), (1000, 2000));
        assert_eq!(agg.current().outbound.count, 1);
        assert_eq!(agg.current().outbound.total_bytes, 50);
    }

    #[test]
    fn test_gap_skips_empty_windows() {
        let mut agg = aggregator(0, 1000);
        agg.ingest(event(100, Direction::Outbound, 50));

        // Jump five windows ahead: only one window is emitted, and the new
        // open window is the one covering the event.
        let closed = agg.ingest(event(5500, Direction::Inbound, 10)).expect("closed");
        assert_eq!((closed.start_ms, closed.end_ms), (0, 1000));
        assert_eq!((agg.current().start_ms, agg.current().end_ms), (5000, 6000));
    }

    #[test]
    fn test_boundaries_aligned_to_origin_not_event() {
        let mut agg = aggregator(250, 1000);
        let closed = agg.ingest(event(1700, Direction::Outbound, 10));

        // 1700 is past [250, 1250): window closes; the new window covering
        // 1700 is [1250, 2250), aligned to the origin.
        assert!(closed.is_some());
        assert_eq!((agg.current().start_ms, agg.current().end_ms), (1250, 2250));
    }

    #[test]
    fn test_event_before_origin_clamped_into_first_window() {
        let mut agg = aggregator(1000, 1000);
        assert!(agg.ingest(event(500, Direction::Outbound, 10)).is_none());
        assert_eq!(agg.current().outbound.count, 1);
    }

    #[test]
    fn test_straggler_clamped_into_open_window() {
        let mut agg = aggregator(0, 1000);
        agg.ingest(event(1500, Direction::Outbound, 10));
        assert_eq!(agg.current().start_ms, 1000);

        // Older than the open window: folded into it, no window reopened
        assert!(agg.ingest(event(800, Direction::Inbound, 20)).is_none());
        assert_eq!(agg.current().inbound.count, 1);
    }

    #[test]
    fn test_no_event_lost_across_closures() {
        let mut agg = aggregator(0, 1000);
        let mut closed_total = 0;
        let timestamps = [0u64, 200, 900, 1000, 1100, 2500, 2600, 7000];

        for &ts in &timestamps {
            if let Some(window) = agg.ingest(event(ts, Direction::Outbound, 1)) {
                closed_total += window.event_count();
            }
        }
        let final_window = agg.flush_current();
        closed_total += final_window.event_count();

        assert_eq!(closed_total, timestamps.len() as u64);
    }

    #[test]
    fn test_latency_folded_into_window() {
        let mut agg = aggregator(0, 1000);
        agg.ingest(event(0, Direction::Outbound, 100));
        agg.ingest(event(250, Direction::Outbound, 100));
        agg.ingest(event(300, Direction::Inbound, 100));

        let window = agg.flush_current();
        // First event has no gap sample; second has 250ms, third 50ms
        assert_eq!(window.outbound.latency.samples, 1);
        assert_eq!(window.outbound.latency.min_ms, 250.0);
        assert_eq!(window.inbound.latency.samples, 1);
        assert_eq!(window.inbound.latency.min_ms, 50.0);
    }

    #[test]
    fn test_latency_gap_spans_window_boundary() {
        let mut agg = aggregator(0, 1000);
        agg.ingest(event(900, Direction::Outbound, 100));
        let _ = agg.ingest(event(1300, Direction::Outbound, 100));

        // The 400ms gap lands in the new window, where the second event lives
        assert_eq!(agg.current().outbound.latency.samples, 1);
        assert_eq!(agg.current().outbound.latency.min_ms, 400.0);
    }

    #[test]
    fn test_flush_current_emits_partial_window() {
        let mut agg = aggregator(0, 1000);
        agg.ingest(event(100, Direction::Outbound, 50));

        let flushed = agg.flush_current();
        assert_eq!((flushed.start_ms, flushed.end_ms), (0, 1000));
        assert_eq!(flushed.outbound.count, 1);

        // Next consecutive window is open and empty
        assert_eq!((agg.current().start_ms, agg.current().end_ms), (1000, 2000));
        assert_eq!(agg.current().event_count(), 0);
    }

    #[test]
    fn test_flush_current_empty_window() {
        let mut agg = aggregator(0, 1000);
        let flushed = agg.flush_current();
        assert_eq!(flushed.event_count(), 0);
        assert_eq!((flushed.start_ms, flushed.end_ms), (0, 1000));
    }

    #[test]
    #[should_panic(expected = "window duration must be non-zero")]
    fn test_zero_window_duration_panics() {
        let _ = aggregator(0, 0);
    }
}
