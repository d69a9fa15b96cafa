//! Step counters and the daily update rule.
//!
//! A daily submission replaces today's figure; the weekly and total counters
//! move by the delta between the old and new daily values. The previous
//! daily and weekly snapshots only feed the trend indicators and are never
//! touched by a submission.

use serde::{Deserialize, Serialize};

/// Team-wide step target shown on the dashboard.
pub const CHALLENGE_TARGET_STEPS: u64 = 250_000;

/// Validated non-negative daily step submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DailySteps(u64);

impl DailySteps {
    /// Wrap an already non-negative count.
    pub fn new(steps: u64) -> Self {
        Self(steps)
    }

    /// Raw count.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for DailySteps {
    type Error = StepUpdateError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| StepUpdateError::Negative)
    }
}

/// Reasons a step update is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StepUpdateError {
    /// Submission was below zero.
    #[error("Please enter a valid number of steps.")]
    Negative,
    /// Stored counters would drop below zero after applying the delta.
    #[error("stored {counter} counter is smaller than today's count")]
    Inconsistent { counter: &'static str },
    /// Applying the delta would overflow a counter.
    #[error("{counter} counter would overflow")]
    Overflow { counter: &'static str },
}

/// Per-user step counters.
///
/// # Examples
/// ```
/// use step_challenge::domain::{DailySteps, StepCounts};
///
/// let counts = StepCounts::new(1000, 5000, 20000, 900, 4800);
/// let updated = counts.with_daily(DailySteps::new(1500)).expect("consistent");
/// assert_eq!(updated.daily(), 1500);
/// assert_eq!(updated.weekly(), 5500);
/// assert_eq!(updated.total(), 20500);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCounts {
    daily: u64,
    weekly: u64,
    total: u64,
    previous_daily: u64,
    previous_weekly: u64,
}

impl StepCounts {
    /// Construct counters from raw values.
    pub fn new(daily: u64, weekly: u64, total: u64, previous_daily: u64, previous_weekly: u64) -> Self {
        Self {
            daily,
            weekly,
            total,
            previous_daily,
            previous_weekly,
        }
    }

    /// Today's steps.
    pub fn daily(&self) -> u64 {
        self.daily
    }

    /// Steps this week.
    pub fn weekly(&self) -> u64 {
        self.weekly
    }

    /// Steps since the challenge started.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Yesterday's daily figure.
    pub fn previous_daily(&self) -> u64 {
        self.previous_daily
    }

    /// Last week's weekly figure.
    pub fn previous_weekly(&self) -> u64 {
        self.previous_weekly
    }

    /// Counters after replacing today's figure with `steps`.
    ///
    /// Uses checked arithmetic throughout; a stored state where the weekly
    /// or total counter is below the daily one is reported rather than
    /// wrapped.
    pub fn with_daily(&self, steps: DailySteps) -> Result<Self, StepUpdateError> {
        let new_daily = steps.get();
        let weekly = shift(self.weekly, self.daily, new_daily, "weekly")?;
        let total = shift(self.total, self.daily, new_daily, "total")?;
        Ok(Self {
            daily: new_daily,
            weekly,
            total,
            ..*self
        })
    }
}

fn shift(counter: u64, old_daily: u64, new_daily: u64, name: &'static str) -> Result<u64, StepUpdateError> {
    let base = counter
        .checked_sub(old_daily)
        .ok_or(StepUpdateError::Inconsistent { counter: name })?;
    base.checked_add(new_daily)
        .ok_or(StepUpdateError::Overflow { counter: name })
}
