use crate::model::{AttemptLog, AttemptRecord, MasteryModel};
use crate::progress::{Progress, compute_progress};

/// Mastery bookkeeping for one run through an exercise.
///
/// `total_attempts` and `past_attempts` come from the same session but are
/// allowed to disagree; nothing here treats a mismatch as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMasteryState {
    total_attempts: u32,
    past_attempts: AttemptLog,
}

impl SessionMasteryState {
    #[must_use]
    pub fn new(total_attempts: u32, past_attempts: AttemptLog) -> Self {
        Self {
            total_attempts,
            past_attempts,
        }
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn past_attempts(&self) -> &AttemptLog {
        &self.past_attempts
    }

    /// Append a response and count it as an attempt.
    pub fn record(&mut self, record: AttemptRecord) {
        self.past_attempts.push(record);
        self.total_attempts = self.total_attempts.saturating_add(1);
    }

    /// Clear the log and the counter when the learner starts over.
    pub fn reset(&mut self) {
        self.past_attempts.reset();
        self.total_attempts = 0;
    }

    /// True when the attempt counter does not match the log length.
    #[must_use]
    pub fn counters_diverge(&self) -> bool {
        usize::try_from(self.total_attempts).map_or(true, |total| total != self.past_attempts.len())
    }

    #[must_use]
    pub fn progress(&self, model: &MasteryModel) -> Progress {
        compute_progress(&self.past_attempts, self.total_attempts, model)
    }
}
