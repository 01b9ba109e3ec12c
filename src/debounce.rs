//! Trailing-edge debounce primitive
//!
//! Delays propagation of a rapidly changing value until it has been stable
//! for a configured interval. Both the search feed and the suggestion feed
//! run their input through a [`Debouncer`] so a typing burst issues one
//! request instead of one per keystroke.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Debounces a stream of values onto a watch channel
///
/// Every call to [`update`](Self::update) cancels the pending emission and
/// reschedules it; only the latest value of a burst is emitted, after the
/// input has been quiet for the full delay. Dropping the debouncer aborts
/// the internal task, so a pending emission never fires after teardown.
///
/// # Examples
///
/// ```no_run
/// use parlor::debounce::Debouncer;
/// use std::time::Duration;
///
/// # async fn example() {
/// let debouncer: Debouncer<String> = Debouncer::new(Duration::from_millis(500));
/// let mut settled = debouncer.subscribe();
/// debouncer.update("r".to_string());
/// debouncer.update("ru".to_string());
/// debouncer.update("rust".to_string());
/// settled.changed().await.unwrap();
/// assert_eq!(settled.borrow().clone(), Some("rust".to_string()));
/// # }
/// ```
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    /// Creates a debouncer emitting after `delay` of input silence
    pub fn new(delay: Duration) -> Self {
        let (input, mut rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, output) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                // The sleep is recreated on every received value, which
                // resets the full delay for the burst's newest value.
                tokio::select! {
                    value = rx.recv() => match value {
                        Some(v) => pending = Some(v),
                        None => break,
                    },
                    _ = tokio::time::sleep(delay), if pending.is_some() => {
                        if out_tx.send(pending.take()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            input,
            output,
            task,
        }
    }

    /// Feeds a new input value, rescheduling the pending emission
    pub fn update(&self, value: T) {
        // Send only fails after the task is gone, at which point there is
        // nobody left to observe the value anyway.
        let _ = self.input.send(value);
    }

    /// Returns a receiver for settled values
    ///
    /// The receiver starts at `None` and yields `Some(value)` for each
    /// emission.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.output.clone()
    }

    /// Returns the most recently settled value, if any
    pub fn latest(&self) -> Option<T> {
        self.output.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::yield_now;
    use tokio::time::advance;

    /// Feeds a value and lets the debounce task observe it
    async fn feed(debouncer: &Debouncer<u32>, value: u32) {
        debouncer.update(value);
        yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let debouncer = Debouncer::new(Duration::from_millis(50));

        // Inputs at t=0, t=10, t=20; delay 50ms
        feed(&debouncer, 1).await;
        advance(Duration::from_millis(10)).await;
        feed(&debouncer, 2).await;
        advance(Duration::from_millis(10)).await;
        feed(&debouncer, 3).await;

        // At t=69 nothing has settled yet
        advance(Duration::from_millis(49)).await;
        yield_now().await;
        assert_eq!(debouncer.latest(), None);

        // At t=70 the value from t=20 arrives; 1 and 2 were swallowed
        advance(Duration::from_millis(1)).await;
        yield_now().await;
        assert_eq!(debouncer.latest(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_quiet_period_emits() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let mut settled = debouncer.subscribe();

        feed(&debouncer, 7).await;
        advance(Duration::from_millis(50)).await;
        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), Some(7));

        feed(&debouncer, 8).await;
        advance(Duration::from_millis(50)).await;
        settled.changed().await.unwrap();
        assert_eq!(*settled.borrow_and_update(), Some(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_before_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        feed(&debouncer, 42).await;
        advance(Duration::from_millis(499)).await;
        yield_now().await;
        assert_eq!(debouncer.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_emission() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let mut settled = debouncer.subscribe();

        feed(&debouncer, 9).await;
        drop(debouncer);
        yield_now().await;

        // The channel closes without ever emitting the pending value
        assert!(settled.changed().await.is_err());
        assert_eq!(*settled.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_debouncer_emits_nothing() {
        let debouncer: Debouncer<u32> = Debouncer::new(Duration::from_millis(10));
        advance(Duration::from_millis(100)).await;
        yield_now().await;
        assert_eq!(debouncer.latest(), None);
    }
}
