use std::time::Duration;

use tokio::sync::mpsc;

/// Trailing-edge debouncer: delivers the most recent submitted value to the
/// callback once the input has been quiet for the whole window. Every submit
/// inside the window cancels the pending delivery and restarts the clock, so
/// the last value always wins.
///
/// Cancellation replaces the pending value only; it never aborts work the
/// callback already started. Dropping the debouncer cancels any pending
/// delivery.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(window: Duration, mut on_quiet: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    match tokio::time::timeout(window, rx.recv()).await {
                        // A newer value arrived in time: restart the window.
                        Ok(Some(next)) => pending = next,
                        // Sender gone with a delivery still pending: cancelled.
                        Ok(None) => return,
                        // Quiet for a full window: fire with the last value.
                        Err(_) => break,
                    }
                }
                on_quiet(pending);
            }
        });

        Self { tx }
    }

    /// Replaces any pending value and restarts the quiet window.
    pub fn submit(&self, value: T) {
        // The worker only exits when this sender is dropped.
        let _ = self.tx.send(value);
    }
}
