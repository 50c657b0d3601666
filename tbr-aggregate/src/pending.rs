//! Bounded buffer for closed windows awaiting a failing sink.

use std::collections::VecDeque;

use tbr_schema::Window;

/// FIFO of closed windows not yet accepted by the sink.
///
/// Bounded at `capacity`; pushing past the bound evicts the oldest window,
/// which is returned to the caller so the drop can be reported. Draining is
/// oldest-first and stops at the first sink failure, preserving monotonic
/// window order in the log.
#[derive(Debug)]
pub struct PendingWindows {
    queue: VecDeque<Window>,
    capacity: usize,
}

impl PendingWindows {
    /// Create a buffer holding at most `capacity` windows.
    ///
    /// `capacity` must be non-zero; the CLI validates this before
    /// construction.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a closed window. Returns the evicted oldest window when the
    /// buffer was full.
    pub fn push(&mut self, window: Window) -> Option<Window> {
        let dropped = if self.queue.len() == self.capacity {
            self.queue.pop_front()
        } else {
            None
        };
        self.queue.push_back(window);
        dropped
    }

    /// Write buffered windows oldest-first until `write` fails or the buffer
    /// empties. Returns how many were written; the failing window stays
    /// buffered for the next attempt.
    pub fn drain_with<E>(
        &mut self,
        mut write: impl FnMut(&Window) -> Result<(), E>,
    ) -> Result<usize, (usize, E)> {
        let mut written = 0;
        while let Some(window) = self.queue.front() {
            match write(window) {
                Ok(()) => {
                    self.queue.pop_front();
                    written += 1;
                }
                Err(e) => return Err((written, e)),
            }
        }
        Ok(written)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
