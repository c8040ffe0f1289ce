//! Growth Stage Model
//!
//! Maps an age in days to a feed regimen and the cumulative weight a pig of
//! that age is expected to have reached.
//!
//! Every stage covers an inclusive day range and either a fixed daily gain
//! or, for the finishing stage, a gain drawn uniformly from a range. The
//! random source is passed in by the caller, so tests can use a seeded
//! generator.

use rand::Rng;
use serde::Serialize;

use super::DomainError;

/// Daily weight gain of a stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DailyGain {
    Fixed(f64),
    /// Drawn once per query from `[low, high]`
    Uniform { low: f64, high: f64 },
}

/// One row of the feeding schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedStage {
    pub start_day: i64,
    pub end_day: i64,
    pub label: &'static str,
    /// Daily ration handed out during the stage
    pub ration: &'static str,
    pub gain: DailyGain,
}

impl FeedStage {
    const fn fixed(
        start_day: i64,
        end_day: i64,
        label: &'static str,
        ration: &'static str,
        gain: f64,
    ) -> Self {
        Self {
            start_day,
            end_day,
            label,
            ration,
            gain: DailyGain::Fixed(gain),
        }
    }

    pub fn contains(&self, age_in_days: i64) -> bool {
        self.start_day <= age_in_days && age_in_days <= self.end_day
    }

    /// Days of this stage a pig of `age_in_days` has lived through
    fn overlap_days(&self, age_in_days: i64) -> i64 {
        let start = self.start_day.max(1);
        let end = age_in_days.min(self.end_day);
        (end - start + 1).max(0)
    }
}

/// The feeding schedule, ordered and disjoint
pub const FEED_SCHEDULE: [FeedStage; 11] = [
    FeedStage::fixed(1, 28, "breastfeeding", "sow's milk", 0.21),
    FeedStage::fixed(29, 42, "feed 2 (early)", "0.00075kg of feed 2", 0.40),
    FeedStage::fixed(43, 56, "feed 2 (mid)", "1kg of feed 2", 1.00),
    FeedStage::fixed(57, 70, "feed 2 (late)", "0.255kg of feed 2", 0.655),
    FeedStage::fixed(71, 85, "feed 3 (early)", "1.4kg of feed 3", 0.71),
    FeedStage::fixed(86, 99, "feed 3 (mid)", "0.805kg of feed 3", 0.805),
    FeedStage::fixed(100, 114, "feed 3 (late-a)", "0.970kg of feed 3", 0.97),
    FeedStage::fixed(115, 128, "feed 3 (late-b)", "1.020kg of feed 3", 1.02),
    FeedStage::fixed(129, 143, "feed 4 (early)", "1.120kg of feed 4", 1.12),
    FeedStage::fixed(144, 157, "feed 4 (mid)", "1.100kg of feed 4", 1.10),
    FeedStage {
        start_day: 158,
        end_day: 240,
        label: "feed 4 (late)",
        ration: "2.5kg of feed 4",
        gain: DailyGain::Uniform {
            low: 1.5,
            high: 2.5,
        },
    },
];

/// Expected weight and feed for one age
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthExpectation {
    pub age_in_days: i64,
    /// Cumulative expected weight in kg, rounded to 3 decimals
    pub expected_weight: f64,
    pub feed_label: &'static str,
    pub ration: &'static str,
}

/// Stage containing `age_in_days`; a newborn (age 0) is breastfeeding
pub fn stage_for(age_in_days: i64) -> Option<&'static FeedStage> {
    let day = if age_in_days == 0 { 1 } else { age_in_days };
    FEED_SCHEDULE.iter().find(|stage| stage.contains(day))
}

/// Cumulative expected weight at `age_in_days`.
///
/// Stages before the age contribute their full span, the current stage a
/// partial span. A randomized stage draws its rate once per call.
pub fn expected_weight<R: Rng + ?Sized>(age_in_days: i64, rng: &mut R) -> f64 {
    let mut weight = 0.0;

    for stage in FEED_SCHEDULE.iter().filter(|s| s.start_day <= age_in_days) {
        let days = stage.overlap_days(age_in_days) as f64;
        weight += match stage.gain {
            DailyGain::Fixed(per_day) => per_day * days,
            DailyGain::Uniform { low, high } => round3(rng.gen_range(low..=high) * days),
        };
    }

    round3(weight)
}

/// Expected weight and feed label for `age_in_days`.
///
/// # Errors
/// - `DomainError::NotYetBorn` for a negative age
/// - `DomainError::OutOfRangeAge` past the last stage
pub fn expected_weight_and_feed<R: Rng + ?Sized>(
    age_in_days: i64,
    rng: &mut R,
) -> Result<GrowthExpectation, DomainError> {
    if age_in_days < 0 {
        return Err(DomainError::NotYetBorn {
            days_until: -age_in_days,
        });
    }

    let stage = stage_for(age_in_days).ok_or(DomainError::OutOfRangeAge(age_in_days))?;

    Ok(GrowthExpectation {
        age_in_days,
        expected_weight: expected_weight(age_in_days, rng),
        feed_label: stage.label,
        ration: stage.ration,
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
