use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Coalesces bursts of raw signals into at most one action per quiet
/// interval.
///
/// Every signal cancels the pending countdown and starts a new one, so
/// the action runs only after the interval passes with no further
/// signals, and at most one countdown is pending at a time.
pub struct Debouncer {
    quiet: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet interval.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Mutex::new(None),
        }
    }

    /// Register a raw signal. The action runs once the quiet interval
    /// elapses without another signal arriving.
    pub fn signal<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();

        if let Some(prev) = self.pending.lock().replace(token.clone()) {
            prev.cancel();
        }

        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(quiet) => action(),
            }
        });
    }

    /// Cancel any pending countdown without running its action.
    pub fn cancel(&self) {
        if let Some(token) = self.pending.lock().take() {
            token.cancel();
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer").field("quiet", &self.quiet).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_burst_runs_action_once() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let runs = Arc::new(AtomicU32::new(0));

        for _ in 0..10 {
            let runs = Arc::clone(&runs);
            debouncer.signal(move || {
                runs.fetch_add(1, Ordering::Relaxed);
            });
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(runs.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_spaced_signals_each_run() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let runs = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let runs = Arc::clone(&runs);
            debouncer.signal(move || {
                runs.fetch_add(1, Ordering::Relaxed);
            });
            tokio::time::sleep(Duration::from_millis(80)).await;
        }

        assert_eq!(runs.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_cancel_prevents_pending_action() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let runs = Arc::new(AtomicU32::new(0));

        {
            let runs = Arc::clone(&runs);
            debouncer.signal(move || {
                runs.fetch_add(1, Ordering::Relaxed);
            });
        }
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_cancel_without_pending_is_noop() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.cancel();
    }
}
