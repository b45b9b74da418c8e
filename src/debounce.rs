//! Trailing-edge debouncer
//!
//! Wraps a handler so a burst of invocations collapses to the most recent
//! one: the handler fires once, a full quiescence window after the final
//! call in the burst, with that call's arguments. The query, detail, and
//! copy paths all sit behind one of these to absorb key repeat without
//! flooding downstream work.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Debounced front for an async handler
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce worker with quiescence window `window`.
    ///
    /// The handler runs on the worker task; a long-running handler delays
    /// subsequent dispatches but never loses the latest pending value.
    pub fn new<F, Fut>(window: Duration, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            let sleep = tokio::time::sleep(window);
            tokio::pin!(sleep);
            let mut pending: Option<T> = None;
            let mut open = true;

            loop {
                tokio::select! {
                    _ = &mut sleep, if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            handler(value).await;
                        }
                        if !open {
                            break;
                        }
                    }
                    received = rx.recv(), if open => match received {
                        Some(value) => {
                            pending = Some(value);
                            sleep.as_mut().reset(Instant::now() + window);
                        }
                        // Sender dropped: let any pending value fire on
                        // schedule, then stop.
                        None => {
                            open = false;
                            if pending.is_none() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { tx }
    }

    /// Record an invocation; only the last one in a burst is dispatched
    pub fn call(&self, value: T) {
        // The worker only exits after the sender side is gone.
        let _ = self.tx.send(value);
    }
}
