//! First-wins settlement and the ceiling race used by event-driven collectors.

use std::{future::Future, sync::Arc};

use parking_lot::Mutex;
use tokio::{sync::oneshot, time::Instant};

/// A value that can be settled exactly once. Later attempts are dropped.
pub struct Settle<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> Settle<T> {
    /// Create the settle handle and the receiver that observes the winner.
    #[must_use]
    pub fn new() -> (Arc<Self>, oneshot::Receiver<T>) {
        let (sender, receiver) = oneshot::channel();
        let settle = Arc::new(Self {
            sender: Mutex::new(Some(sender)),
        });
        (settle, receiver)
    }

    /// Offer `value`. Returns `true` if it won.
    pub fn settle(&self, value: T) -> bool {
        match self.sender.lock().take() {
            Some(sender) => sender.send(value).is_ok(),
            None => false,
        }
    }
}

/// Run `work` until the wall-clock `deadline`.
///
/// The deadline is absolute so it holds even when this future is first
/// polled late. `work` and a timer run as separate tasks that both try to settle the
/// result; the timer settles with `fallback()`. Whichever loses is discarded
/// and the work task is aborted, so events arriving after the ceiling are
/// never observed.
///
/// Returns `None` only if neither side could settle, which happens when the
/// runtime is shutting down.
pub async fn race_ceiling<T, F, G>(work: F, deadline: Instant, fallback: G) -> Option<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
    G: FnOnce() -> T + Send + 'static,
{
    let (settle, receiver) = Settle::new();

    let work_settle = Arc::clone(&settle);
    let work_task = tokio::spawn(async move {
        let value = work.await;
        work_settle.settle(value);
    });

    let timer_settle = settle;
    let timer_task = tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        timer_settle.settle(fallback());
    });

    let winner = receiver.await.ok();
    work_task.abort();
    timer_task.abort();
    winner
}
