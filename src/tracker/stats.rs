use std::sync::atomic::{AtomicU64, Ordering};

use super::event::{EventName, MAX_EVENT_NAME};

/// Lock-free per-EventName emission counters.
///
/// `snapshot()` atomically reads and resets all counters, making it
/// suitable for periodic reporting without contention.
pub struct EmitStats {
    counts: [AtomicU64; MAX_EVENT_NAME + 1],
}

impl EmitStats {
    /// Create a new zeroed EmitStats.
    pub fn new() -> Self {
        Self {
            counts: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Increment the counter for the given event name by one.
    pub fn record(&self, name: EventName) {
        if let Some(counter) = self.counts.get(name as usize) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Atomically read and reset all counters, returning only non-zero entries.
    pub fn snapshot(&self) -> Vec<(EventName, u64)> {
        let mut result = Vec::new();

        for (i, counter) in self.counts.iter().enumerate() {
            let v = counter.swap(0, Ordering::Relaxed);
            if v > 0 {
                if let Some(name) = EventName::from_u8(i as u8) {
                    result.push((name, v));
                }
            }
        }

        result
    }
}

impl Default for EmitStats {
    fn default() -> Self {
        Self::new()
    }
}
