use std::cell::Cell;
use std::fmt;

use tracing::debug;

use mastery_core::model::{
    AttemptRecord, ExerciseContext, MasteryModel, MasteryModelError, SessionMasteryState,
};
use mastery_core::{Clock, Progress, progress_breakdown};

use crate::error::SnapshotError;
use crate::snapshot::MasterySnapshot;

//
// ─── PROGRESS VIEW ─────────────────────────────────────────────────────────────
//

/// Aggregated view of exercise progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseProgress {
    pub progress: Progress,
    pub correct: u32,
    pub required: u32,
    pub total_attempts: u32,
    pub is_mastered: bool,
}

#[derive(Debug, Clone, Copy)]
struct CachedProgress {
    revision: u64,
    total_attempts: u32,
    view: ExerciseProgress,
}

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

/// Host-side owner of one exercise run.
///
/// Records responses, handles start-over, and serves the current progress.
/// The computed view is cached until the attempt log revision or the attempt
/// counter changes.
pub struct MasteryTracker {
    clock: Clock,
    context: ExerciseContext,
    model: MasteryModel,
    state: SessionMasteryState,
    cached: Cell<Option<CachedProgress>>,
}

impl MasteryTracker {
    #[must_use]
    pub fn new(clock: Clock, context: ExerciseContext, model: MasteryModel) -> Self {
        Self::with_state(clock, context, model, SessionMasteryState::default())
    }

    /// Resume a run from previously captured state.
    #[must_use]
    pub fn with_state(
        clock: Clock,
        context: ExerciseContext,
        model: MasteryModel,
        state: SessionMasteryState,
    ) -> Self {
        Self {
            clock,
            context,
            model,
            state,
            cached: Cell::new(None),
        }
    }

    /// Resume a run from decoded host state.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Model` with `MissingKind` if the snapshot
    /// carried no mastery model; a tracker cannot record attempts without one.
    pub fn from_snapshot(clock: Clock, snapshot: MasterySnapshot) -> Result<Self, SnapshotError> {
        let model = snapshot.model.ok_or(MasteryModelError::MissingKind)?;
        Ok(Self::with_state(clock, snapshot.context, model, snapshot.state))
    }

    #[must_use]
    pub fn context(&self) -> &ExerciseContext {
        &self.context
    }

    #[must_use]
    pub fn model(&self) -> &MasteryModel {
        &self.model
    }

    #[must_use]
    pub fn state(&self) -> &SessionMasteryState {
        &self.state
    }

    /// Record a learner response stamped with the tracker's clock.
    pub fn record_attempt(&mut self, correct: bool) -> ExerciseProgress {
        let answered_at = self.clock.now();
        self.state.record(AttemptRecord::answered(correct, answered_at));
        debug!(
            exercise = self.context.exercise_label(),
            correct,
            total_attempts = self.state.total_attempts(),
            "recorded attempt"
        );
        self.progress()
    }

    /// Drop all attempts; the learner starts the exercise again.
    pub fn start_over(&mut self) {
        self.state.reset();
        debug!(exercise = self.context.exercise_label(), "exercise started over");
    }

    /// Move a fixed clock forward; no effect on the system clock.
    pub fn advance_clock(&mut self, delta: chrono::Duration) {
        self.clock.advance(delta);
    }

    /// Current progress, recomputed only when the inputs changed.
    #[must_use]
    pub fn progress(&self) -> ExerciseProgress {
        let revision = self.state.past_attempts().revision();
        let total_attempts = self.state.total_attempts();

        if let Some(cached) = self.cached.get() {
            if cached.revision == revision && cached.total_attempts == total_attempts {
                return cached.view;
            }
        }

        let breakdown = progress_breakdown(self.state.past_attempts(), total_attempts, &self.model);
        let view = ExerciseProgress {
            progress: breakdown.progress,
            correct: breakdown.correct_count,
            required: breakdown.required_correct,
            total_attempts,
            is_mastered: breakdown.progress.is_complete(),
        };
        self.cached.set(Some(CachedProgress {
            revision,
            total_attempts,
            view,
        }));
        view
    }
}

impl fmt::Debug for MasteryTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasteryTracker")
            .field("exercise_id", &self.context.exercise_id)
            .field("model", &self.model)
            .field("total_attempts", &self.state.total_attempts())
            .field("logged", &self.state.past_attempts().len())
            .field("revision", &self.state.past_attempts().revision())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use mastery_core::model::ExerciseId;
    use mastery_core::time::fixed_now;

    fn tracker(m: u32, n: u32) -> MasteryTracker {
        MasteryTracker::new(
            Clock::fixed(fixed_now()),
            ExerciseContext::new(ExerciseId::random()),
            MasteryModel::m_of_n(m, n).unwrap(),
        )
    }

    #[test]
    fn fresh_tracker_has_no_progress() {
        let t = tracker(2, 3);
        let view = t.progress();
        assert_eq!(view.progress, Progress::ZERO);
        assert_eq!(view.required, 2);
        assert!(!view.is_mastered);
    }

    #[test]
    fn records_attempts_with_clock_time() {
        let mut t = tracker(2, 3);
        t.record_attempt(false);
        let view = t.record_attempt(true);

        assert_eq!(view.progress.value(), 0.5);
        assert_eq!(view.correct, 1);
        assert_eq!(view.total_attempts, 2);

        let last = t.state().past_attempts().records().last().copied().unwrap();
        assert_eq!(last.answered_at(), Some(fixed_now()));
    }

    #[test]
    fn reaches_mastery_at_m_correct() {
        let mut t = tracker(3, 5);
        for correct in [true, false, true, false] {
            assert!(!t.record_attempt(correct).is_mastered);
        }
        assert!(t.record_attempt(true).is_mastered);
    }

    #[test]
    fn start_over_resets_progress() {
        let mut t = tracker(1, 1);
        assert!(t.record_attempt(true).is_mastered);

        t.start_over();
        let view = t.progress();
        assert_eq!(view.progress, Progress::ZERO);
        assert_eq!(view.total_attempts, 0);
    }

    #[test]
    fn cached_view_tracks_log_revision() {
        let mut t = tracker(4, 4);
        let before = t.progress();
        assert_eq!(t.progress(), before);

        t.record_attempt(true);
        assert_eq!(t.progress().correct, 1);
        assert_ne!(t.progress(), before);
    }

    #[test]
    fn snapshot_without_model_cannot_start_tracker() {
        let snapshot =
            MasterySnapshot::from_json(r#"{"masteryModel": {}, "pastattempts": []}"#).unwrap();
        let err = MasteryTracker::from_snapshot(Clock::fixed(fixed_now()), snapshot).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Model(MasteryModelError::MissingKind)
        ));
    }

    #[test]
    fn advancing_clock_changes_timestamps() {
        let mut t = tracker(2, 2);
        t.record_attempt(true);
        t.advance_clock(chrono::Duration::minutes(1));
        t.record_attempt(true);

        let records = t.state().past_attempts().records();
        assert_eq!(
            records[1].answered_at(),
            Some(fixed_now() + chrono::Duration::minutes(1))
        );
    }
}
