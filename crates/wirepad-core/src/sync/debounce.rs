//! Edit coalescing
//!
//! Collapses a rapid burst of triggers into a single trailing emission.

use std::time::Duration;

use tokio::sync::mpsc;

/// Trailing-edge debouncer.
///
/// Values scheduled within `delay` of each other collapse into one
/// emission carrying the most recent value. There is no explicit cancel:
/// a newer schedule supersedes the pending one, and dropping the handle
/// discards anything still pending.
#[derive(Debug)]
pub struct Debouncer<T> {
    trigger_tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn a debouncer task. Coalesced values arrive on the returned
    /// channel after `delay` of quiet.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        tokio::spawn(debounce_task(delay, trigger_rx, out_tx));

        (Self { trigger_tx }, out_rx)
    }

    /// Record intent to emit `value` once the burst goes quiet.
    pub fn schedule(&self, value: T) {
        // Task gone means the session is tearing down; nothing to emit.
        let _ = self.trigger_tx.send(value);
    }
}

async fn debounce_task<T>(
    delay: Duration,
    mut trigger_rx: mpsc::UnboundedReceiver<T>,
    out_tx: mpsc::UnboundedSender<T>,
) {
    loop {
        // Idle until the first trigger of a burst.
        let Some(mut pending) = trigger_rx.recv().await else {
            return;
        };

        loop {
            tokio::select! {
                next = trigger_rx.recv() => match next {
                    // A newer value supersedes the pending one and
                    // restarts the quiet period.
                    Some(value) => pending = value,
                    // Sender dropped mid-burst: the pending value dies
                    // with it, mirroring page unload.
                    None => return,
                },
                _ = tokio::time::sleep(delay) => {
                    if out_tx.send(pending).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_last_value_once() {
        let (debouncer, mut out) = Debouncer::spawn(DELAY);

        for i in 0..10 {
            debouncer.schedule(i);
        }

        assert_eq!(out.recv().await, Some(9));

        // Quiet afterwards: the burst produced exactly one emission.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(out.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_trigger_restarts_quiet_period() {
        let start = Instant::now();
        let (debouncer, mut out) = Debouncer::spawn(DELAY);

        debouncer.schedule("a");
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule("b");

        assert_eq!(out.recv().await, Some("b"));
        // The second schedule restarted the timer, so the emission lands
        // a full delay after it, not after the first.
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (debouncer, mut out) = Debouncer::spawn(DELAY);

        debouncer.schedule(1);
        assert_eq!(out.recv().await, Some(1));

        debouncer.schedule(2);
        assert_eq!(out.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending() {
        let (debouncer, mut out) = Debouncer::spawn(DELAY);

        debouncer.schedule(1);
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(out.try_recv().is_err());
    }
}
