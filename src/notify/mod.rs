//! Notification module
//!
//! Collaborators the handlers talk to instead of a user interface: a
//! fire-and-forget notifier, an interactive prompt, and a scheduler for
//! deferred reminders.

mod scheduler;

use std::time::Duration;

pub use scheduler::{ReminderHandle, ReminderScheduler};

/// Fire-and-forget notification sink (no delivery guarantee)
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, title: &str, message: &str, timeout: Duration);
}

/// Interactive questions put to the operator
pub trait Prompt {
    /// `None` means the operator cancelled; it is not the same as zero
    fn ask_float(&self, prompt: &str) -> Option<f64>;

    /// Yes/no confirmation
    fn confirm(&self, question: &str) -> bool;
}

/// Notifier that writes notifications to the log
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, timeout: Duration) {
        tracing::info!(
            title = %title,
            timeout_secs = timeout.as_secs(),
            "{}",
            message
        );
    }
}

/// Prompt answered up front, e.g. from a request body
#[derive(Debug, Clone, Default)]
pub struct PresetAnswers {
    pub number: Option<f64>,
    pub confirmation: bool,
}

impl PresetAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, number: Option<f64>) -> Self {
        self.number = number;
        self
    }

    pub fn with_confirmation(mut self, confirmation: bool) -> Self {
        self.confirmation = confirmation;
        self
    }
}

impl Prompt for PresetAnswers {
    fn ask_float(&self, prompt: &str) -> Option<f64> {
        tracing::debug!(prompt = %prompt, answer = ?self.number, "Answered prompt");
        self.number
    }

    fn confirm(&self, question: &str) -> bool {
        tracing::debug!(question = %question, answer = self.confirmation, "Answered confirmation");
        self.confirmation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_answers() {
        let answers = PresetAnswers::new()
            .with_number(Some(42.5))
            .with_confirmation(true);

        assert_eq!(answers.ask_float("Actual weight?"), Some(42.5));
        assert!(answers.confirm("Farrowed?"));
    }

    #[test]
    fn test_cancelled_prompt_is_none() {
        let answers = PresetAnswers::new();
        assert_eq!(answers.ask_float("Actual weight?"), None);
        assert!(!answers.confirm("Farrowed?"));
    }
}
