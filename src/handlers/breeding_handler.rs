//! Breeding Handler
//!
//! Records services, keeps the farrowing countdown, and applies the
//! effects of each countdown state: a farrowing confirmation when due and
//! one deferred reminder when imminent.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::breeding::countdown_message;
use crate::domain::{DomainError, Urgency};
use crate::error::AppResult;
use crate::notify::{Notifier, Prompt, ReminderScheduler};
use crate::records::{BreedingEntry, Record};
use crate::store::RecordStore;

use super::RecordServiceCommand;

/// Title used for every breeding notification
pub const NOTIFICATION_TITLE: &str = "Pig Breeding Calculator";

/// Confirmation asked when farrowing is due today
pub const FARROWED_QUESTION: &str =
    "The pig has farrowed! Do you want to delete this pig from the database?";

/// Reminders belong to one breeding entry, not to the sow
fn reminder_key(entry_id: i64) -> String {
    format!("breeding-entry-{}", entry_id)
}

/// An entry with its countdown on a given date
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
    #[serde(flatten)]
    pub entry: BreedingEntry,
    pub days_left: i64,
    pub urgency: Urgency,
    pub stale: bool,
}

impl EntryStatus {
    fn of(entry: BreedingEntry, as_of: NaiveDate) -> Self {
        Self {
            days_left: entry.days_left(as_of),
            urgency: entry.urgency(as_of),
            stale: entry.is_stale(as_of),
            entry,
        }
    }
}

/// What the effect step did for one entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectOutcome {
    /// Entry deleted after a farrowing confirmation
    pub removed: bool,
    pub reminder_scheduled: bool,
}

/// Result of recording a service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutcome {
    pub status: EntryStatus,
    pub effects: EffectOutcome,
    pub message: String,
}

/// Handler for breeding entries
pub struct BreedingHandler<S> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    reminders: Arc<ReminderScheduler>,
    notification_timeout: Duration,
}

impl<S: RecordStore> BreedingHandler<S> {
    pub fn new(
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        reminders: Arc<ReminderScheduler>,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            reminders,
            notification_timeout,
        }
    }

    /// Store a service, then apply the effects of its countdown
    pub async fn record_service<P>(
        &self,
        command: RecordServiceCommand,
        as_of: NaiveDate,
        prompt: &P,
    ) -> AppResult<ServiceOutcome>
    where
        P: Prompt + Sync + ?Sized,
    {
        let pig_identifier = command.pig_identifier.trim().to_string();
        if pig_identifier.is_empty() {
            return Err(crate::AppError::InvalidRequest(
                "pig_identifier must not be empty".to_string(),
            ));
        }

        let entry = BreedingEntry::new(pig_identifier, command.served_date);
        let id = self.store.insert(&entry).await?;
        let entry = entry.with_id(id);

        tracing::info!(
            pig = %entry.pig_identifier(),
            expected = %entry.expected_event_date(),
            "Recorded service"
        );

        let status = EntryStatus::of(entry, as_of);
        let effects = self.apply_effects(&status, prompt).await?;
        let message = countdown_message(status.days_left);

        Ok(ServiceOutcome {
            status,
            effects,
            message,
        })
    }

    /// Apply the side effects of an entry's countdown state.
    ///
    /// `Due` asks for a farrowing confirmation and deletes the entry on yes;
    /// `Imminent` schedules one reminder. A countdown notification is sent
    /// in every case.
    pub async fn apply_effects<P>(&self, status: &EntryStatus, prompt: &P) -> AppResult<EffectOutcome>
    where
        P: Prompt + Sync + ?Sized,
    {
        let message = countdown_message(status.days_left);
        let mut outcome = EffectOutcome::default();

        match status.urgency {
            Urgency::Due => {
                if prompt.confirm(FARROWED_QUESTION) {
                    if let Some(id) = status.entry.id() {
                        self.confirm_farrowed(id).await?;
                        outcome.removed = true;
                    }
                }
            }
            Urgency::Imminent => {
                if let Some(id) = status.entry.id() {
                    self.reminders
                        .schedule(&reminder_key(id), NOTIFICATION_TITLE, &message);
                    outcome.reminder_scheduled = true;
                }
            }
            Urgency::Normal => {}
        }

        self.notifier
            .notify(NOTIFICATION_TITLE, &message, self.notification_timeout);

        Ok(outcome)
    }

    /// Every entry with its countdown, soonest first
    pub async fn list(&self, as_of: NaiveDate) -> AppResult<Vec<EntryStatus>> {
        let mut entries: Vec<EntryStatus> = self
            .store
            .fetch_all::<BreedingEntry>()
            .await?
            .into_iter()
            .map(|entry| EntryStatus::of(entry, as_of))
            .collect();

        entries.sort_by_key(|status| status.days_left);
        Ok(entries)
    }

    /// Delete an entry after the operator confirms farrowing
    pub async fn confirm_farrowed(&self, entry_id: i64) -> AppResult<BreedingEntry> {
        let entry = self
            .store
            .fetch_by_id::<BreedingEntry>(entry_id)
            .await?
            .ok_or(DomainError::EntryNotFound(entry_id))?;

        self.store.delete::<BreedingEntry>(entry_id).await?;
        self.reminders.cancel(&reminder_key(entry_id));

        tracing::info!(pig = %entry.pig_identifier(), "Removed farrowed sow from breeding list");
        Ok(entry)
    }

    /// Delete every entry whose expected date has passed
    pub async fn purge_farrowed(&self, as_of: NaiveDate) -> AppResult<usize> {
        let stale: Vec<BreedingEntry> = self
            .store
            .fetch_all::<BreedingEntry>()
            .await?
            .into_iter()
            .filter(|entry| entry.is_stale(as_of))
            .collect();

        for entry in &stale {
            if let Some(id) = entry.id() {
                self.store.delete::<BreedingEntry>(id).await?;
                self.reminders.cancel(&reminder_key(id));
            }
        }

        tracing::info!(removed = stale.len(), "Purged farrowed sows");
        Ok(stale.len())
    }
}
