use std::fmt;

use crate::model::{AttemptLog, MasteryModel, MofN};

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Normalized advancement toward mastery, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Progress(f64);

impl Progress {
    pub const ZERO: Progress = Progress(0.0);
    pub const COMPLETE: Progress = Progress(1.0);

    /// Builds a progress value, clamping into `[0, 1]`. NaN maps to zero.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// True once mastery has been reached.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }

    /// Whole percent for progress indicators (0..=100).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

impl From<Progress> for f64 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

/// The inputs of the progress fraction next to its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBreakdown {
    pub progress: Progress,
    pub correct_count: u32,
    pub required_correct: u32,
}

//
// ─── CALCULATOR ────────────────────────────────────────────────────────────────
//

/// Progress toward mastering an exercise.
///
/// An empty log is always zero progress, whatever the counter or model say.
/// `total_attempts` is accepted for parity with the host state but does not
/// otherwise affect the result.
#[must_use]
pub fn compute_progress(
    past_attempts: &AttemptLog,
    total_attempts: u32,
    model: &MasteryModel,
) -> Progress {
    progress_breakdown(past_attempts, total_attempts, model).progress
}

/// Same as [`compute_progress`], also reporting the counts it was derived from.
#[must_use]
pub fn progress_breakdown(
    past_attempts: &AttemptLog,
    _total_attempts: u32,
    model: &MasteryModel,
) -> ProgressBreakdown {
    let required_correct = model.required_correct();
    let correct_count = u32::try_from(past_attempts.correct_count()).unwrap_or(u32::MAX);

    if past_attempts.is_empty() {
        return ProgressBreakdown {
            progress: Progress::ZERO,
            correct_count,
            required_correct,
        };
    }

    let progress = match model {
        MasteryModel::MofN(m_of_n) => m_of_n_progress(correct_count, *m_of_n),
    };

    ProgressBreakdown {
        progress,
        correct_count,
        required_correct,
    }
}

/// Correct responses anywhere in the log count, capped at `m`; `n` is ignored.
fn m_of_n_progress(correct_count: u32, model: MofN) -> Progress {
    let m = model.m();
    if m == 0 {
        return Progress::ZERO;
    }
    Progress::clamped(f64::from(correct_count.min(m)) / f64::from(m))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
