//! Single-flight delayed execution.
//!
//! [`Debouncer`] collapses bursts of schedule calls into at most one
//! execution per quiescence period. The controller uses one instance to
//! rate-limit gif dispatch and a second as the cancelable burn-in timer;
//! the utility itself knows nothing about queries or results.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Schedules a callback to run once after a fixed delay; a new schedule
/// call cancels any not-yet-fired pending one.
///
/// Across N [`schedule`](Self::schedule) calls issued within less than the
/// delay of each other, exactly the last one fires, or none at all if
/// [`cancel`](Self::cancel) is called before it does.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates an unarmed debouncer.
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Arms `f` to run once after `delay`, cancelling any pending callback.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        }));
    }

    /// Disarms the pending callback if one is armed.
    ///
    /// Idempotent: a no-op when nothing is pending, when the callback has
    /// already fired, or when called repeatedly.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// True while a scheduled callback is armed and has not yet fired.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(50);

    fn counting(fired: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let fired = Arc::clone(fired);
        move || {
            fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_exactly_once_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        debouncer.schedule(DELAY, counting(&fired));
        sleep(Duration::from_millis(49)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_cancels_pending_callback() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        debouncer.schedule(DELAY, counting(&first));
        sleep(Duration::from_millis(25)).await;
        debouncer.schedule(DELAY, counting(&second));

        // Past the first deadline, before the second.
        sleep(Duration::from_millis(30)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(25)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_fire() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        debouncer.schedule(DELAY, counting(&fired));
        debouncer.cancel();
        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        // Never armed.
        debouncer.cancel();
        debouncer.cancel();

        // Already fired.
        debouncer.schedule(DELAY, counting(&fired));
        sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        debouncer.cancel();
        debouncer.cancel();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = Debouncer::new();
            debouncer.schedule(DELAY, counting(&fired));
        }
        sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn is_pending_tracks_lifecycle() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.is_pending());

        debouncer.schedule(DELAY, counting(&fired));
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(60)).await;
        assert!(!debouncer.is_pending());
    }
}
