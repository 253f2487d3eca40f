use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use mastery_core::model::{
    AssessmentItemId, AttemptLog, AttemptRecord, ExerciseContext, ExerciseId, MasteryModel,
    MasteryModelDraft, SessionMasteryState, UserId,
};
use mastery_core::{Progress, compute_progress};

use crate::error::SnapshotError;

//
// ─── WIRE FORM ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    exercise_id: Option<ExerciseId>,
    #[serde(default)]
    user_id: Option<UserId>,
    #[serde(default)]
    randomize: bool,
    #[serde(default, rename = "assessmentIds")]
    assessment_ids: Vec<AssessmentItemId>,
    #[serde(default, rename = "masteryModel")]
    mastery_model: MasteryModelDraft,
    #[serde(default)]
    totalattempts: Option<Value>,
    #[serde(default)]
    pastattempts: Value,
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Host state for one exercise run, decoded and validated.
///
/// Decoding is lenient about attempt data and identity and strict about the
/// mastery model: unusable `correct` flags become incorrect records, ids are
/// kept as given, while an invalid model rejects the whole snapshot. A
/// snapshot with no attempts may omit the model entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterySnapshot {
    pub context: ExerciseContext,
    pub model: Option<MasteryModel>,
    pub state: SessionMasteryState,
    malformed_records: usize,
}

impl MasterySnapshot {
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` for malformed JSON and
    /// `SnapshotError::Model` if the mastery model does not validate.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// # Errors
    ///
    /// Same as [`MasterySnapshot::from_json`].
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSnapshot) -> Result<Self, SnapshotError> {
        let context = ExerciseContext {
            exercise_id: raw.exercise_id,
            user_id: raw.user_id,
            randomize: raw.randomize,
            assessment_ids: raw.assessment_ids,
        };

        let (log, malformed_records) = decode_attempts(&raw.pastattempts, &context);

        let model = if log.is_empty() && raw.mastery_model.is_blank() {
            debug!(
                exercise = context.exercise_label(),
                "no attempts and no mastery model; progress is zero"
            );
            None
        } else {
            Some(MasteryModel::try_from(raw.mastery_model)?)
        };

        let total_attempts = decode_total_attempts(raw.totalattempts.as_ref());
        let state = SessionMasteryState::new(total_attempts, log);
        if state.counters_diverge() {
            debug!(
                exercise = context.exercise_label(),
                total_attempts,
                logged = state.past_attempts().len(),
                "attempt counter differs from attempt log length"
            );
        }

        Ok(Self {
            context,
            model,
            state,
            malformed_records,
        })
    }

    /// Number of attempt records whose `correct` flag could not be read.
    #[must_use]
    pub fn malformed_records(&self) -> usize {
        self.malformed_records
    }

    /// Zero when the snapshot has no model, which only happens with no attempts.
    #[must_use]
    pub fn progress(&self) -> Progress {
        match &self.model {
            Some(model) => compute_progress(
                self.state.past_attempts(),
                self.state.total_attempts(),
                model,
            ),
            None => Progress::ZERO,
        }
    }
}

/// Non-array `pastattempts` (absent, `null`, `0`) reads as an empty log.
fn decode_attempts(value: &Value, context: &ExerciseContext) -> (AttemptLog, usize) {
    let Value::Array(items) = value else {
        if !value.is_null() {
            debug!(
                exercise = context.exercise_label(),
                raw = %value,
                "pastattempts is not a list; treating as empty"
            );
        }
        return (AttemptLog::new(), 0);
    };

    let mut malformed = 0_usize;
    let log = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let correct = decode_correct(item.get("correct")).unwrap_or_else(|| {
                malformed += 1;
                warn!(
                    exercise = context.exercise_label(),
                    index,
                    raw = %item,
                    "attempt record has no usable correct flag; counting it as incorrect"
                );
                false
            });
            AttemptRecord::new(correct)
        })
        .collect();
    (log, malformed)
}

/// Accepts booleans and the numbers 0 and 1.
fn decode_correct(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Absent or non-numeric counters read as zero.
fn decode_total_attempts(value: Option<&Value>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
        Some(total) => total,
        None => {
            debug!(raw = %value, "unusable totalattempts; treating as 0");
            0
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
