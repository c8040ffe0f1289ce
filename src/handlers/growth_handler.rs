//! Growth Handler
//!
//! Feed calculator: expected weight and feed stage for a batch, compared
//! against a weighed animal when the operator supplies a weight.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::domain::{
    expected_weight_and_feed, BatchIdentifier, DomainError, GrowthExpectation, HealthStatus, Weight,
};
use crate::error::AppResult;
use crate::notify::Prompt;
use crate::store::RecordStore;

use super::find_batch;

/// Question put to the operator for the weighed animal
pub const ACTUAL_WEIGHT_PROMPT: &str = "Enter the actual weight of the pig:";

/// Result of a growth assessment
#[derive(Debug, Clone, Serialize)]
pub struct GrowthAssessment {
    pub batch_identifier: BatchIdentifier,
    pub age_in_days: i64,
    pub expected_weight: f64,
    pub feed_label: &'static str,
    pub ration: &'static str,
    /// `None` when the operator cancelled the weight prompt
    pub actual_weight: Option<f64>,
    pub health: Option<HealthStatus>,
}

/// Handler for growth assessments
pub struct GrowthHandler<S> {
    store: Arc<S>,
    rng: Mutex<StdRng>,
}

impl<S: RecordStore> GrowthHandler<S> {
    /// Create a handler; a seed makes the randomized stage reproducible
    pub fn new(store: Arc<S>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Assess a batch on `as_of`, asking `prompt` for the actual weight
    pub async fn assess<P>(
        &self,
        identifier: BatchIdentifier,
        as_of: NaiveDate,
        prompt: &P,
    ) -> AppResult<GrowthAssessment>
    where
        P: Prompt + Sync + ?Sized,
    {
        let batch = find_batch(self.store.as_ref(), identifier).await?;
        let age = batch.age_on(as_of);

        let expectation = self.expectation(age).map_err(|e| {
            tracing::warn!(batch = %identifier, age_days = age, "No growth stage: {}", e);
            e
        })?;

        let actual_weight = prompt
            .ask_float(ACTUAL_WEIGHT_PROMPT)
            .map(Weight::new)
            .transpose()?
            .map(|w| w.kg());

        let health =
            actual_weight.map(|actual| HealthStatus::classify(expectation.expected_weight, actual));

        tracing::info!(
            batch = %identifier,
            age_days = age,
            expected_weight = expectation.expected_weight,
            feed = expectation.feed_label,
            health = ?health,
            "Assessed batch growth"
        );

        Ok(GrowthAssessment {
            batch_identifier: identifier,
            age_in_days: age,
            expected_weight: expectation.expected_weight,
            feed_label: expectation.feed_label,
            ration: expectation.ration,
            actual_weight,
            health,
        })
    }

    fn expectation(&self, age: i64) -> Result<GrowthExpectation, DomainError> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        expected_weight_and_feed(age, &mut *rng)
    }
}
