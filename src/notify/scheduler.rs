//! Reminder Scheduler
//!
//! One-shot deferred notifications. Each reminder is a Tokio task with an
//! explicit handle; scheduling again for the same key cancels the earlier
//! task, so repeated calls never pile up timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

use super::Notifier;

/// Handle to one scheduled reminder
#[derive(Debug, Clone)]
pub struct ReminderHandle {
    task: AbortHandle,
}

impl ReminderHandle {
    /// Cancel the reminder; a no-op once it has fired
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Fired or cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Schedules deferred notifications keyed by subject (e.g. a breeding entry)
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    delay: Duration,
    display_timeout: Duration,
    pending: Mutex<HashMap<String, AbortHandle>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, delay: Duration, display_timeout: Duration) -> Self {
        Self {
            notifier,
            delay,
            display_timeout,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Deliver `message` once after the configured delay.
    ///
    /// Must be called from within a Tokio runtime. A reminder already
    /// pending for `key` is cancelled first.
    pub fn schedule(&self, key: &str, title: &str, message: &str) -> ReminderHandle {
        let notifier = Arc::clone(&self.notifier);
        let delay = self.delay;
        let display_timeout = self.display_timeout;
        let title = title.to_string();
        let message = message.to_string();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.notify(&title, &message, display_timeout);
        })
        .abort_handle();

        if let Some(previous) = self.pending().insert(key.to_string(), task.clone()) {
            previous.abort();
            tracing::debug!(key = %key, "Replaced pending reminder");
        }

        tracing::info!(key = %key, delay_secs = delay.as_secs(), "Scheduled reminder");

        ReminderHandle { task }
    }

    /// Cancel the reminder pending for `key`, if any
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending().remove(key) {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Number of reminders that have not fired yet
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending();
        pending.retain(|_, task| !task.is_finished());
        pending.len()
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for (_, task) in self.pending().drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, _title: &str, message: &str, _timeout: Duration) {
            self.sent.lock().unwrap().push(message.to_string());
        }
    }

    fn scheduler(recorder: &Arc<Recorder>) -> ReminderScheduler {
        ReminderScheduler::new(
            recorder.clone(),
            Duration::from_secs(86_400),
            Duration::from_secs(10),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_after_delay() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler(&recorder);

        let handle = scheduler.schedule("entry-1", "Breeding", "3 days left");
        assert_eq!(scheduler.pending_count(), 1);

        tokio::time::sleep(Duration::from_secs(86_399)).await;
        assert!(recorder.sent.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;

        assert_eq!(*recorder.sent.lock().unwrap(), vec!["3 days left".to_string()]);
        assert!(handle.is_finished());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_replaces_previous() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler(&recorder);

        let first = scheduler.schedule("entry-1", "Breeding", "4 days left");
        let _second = scheduler.schedule("entry-1", "Breeding", "3 days left");
        assert_eq!(scheduler.pending_count(), 1);

        tokio::time::sleep(Duration::from_secs(86_401)).await;
        tokio::task::yield_now().await;

        assert!(first.is_finished());
        assert_eq!(*recorder.sent.lock().unwrap(), vec!["3 days left".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reminder_never_fires() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler(&recorder);

        scheduler.schedule("entry-2", "Breeding", "1 days left");
        assert!(scheduler.cancel("entry-2"));
        assert!(!scheduler.cancel("entry-2"));

        tokio::time::sleep(Duration::from_secs(90_000)).await;
        tokio::task::yield_now().await;

        assert!(recorder.sent.lock().unwrap().is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_keys() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = scheduler(&recorder);

        scheduler.schedule("entry-1", "Breeding", "a");
        scheduler.schedule("entry-2", "Breeding", "b");
        assert_eq!(scheduler.pending_count(), 2);

        tokio::time::sleep(Duration::from_secs(86_401)).await;
        tokio::task::yield_now().await;

        let mut sent = recorder.sent.lock().unwrap().clone();
        sent.sort();
        assert_eq!(sent, vec!["a".to_string(), "b".to_string()]);
    }
}
