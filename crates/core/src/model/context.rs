use serde::{Deserialize, Serialize};

use crate::model::ids::{AssessmentItemId, ExerciseId, UserId};

/// Identity of the exercise run a mastery state belongs to.
///
/// Carried alongside the state for the host's benefit; progress computation
/// never looks at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseContext {
    #[serde(default)]
    pub exercise_id: Option<ExerciseId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub randomize: bool,
    #[serde(default)]
    pub assessment_ids: Vec<AssessmentItemId>,
}

impl ExerciseContext {
    #[must_use]
    pub fn new(exercise_id: ExerciseId) -> Self {
        Self {
            exercise_id: Some(exercise_id),
            ..Self::default()
        }
    }

    /// Exercise id for log lines; empty when the host supplied none.
    #[must_use]
    pub fn exercise_label(&self) -> &str {
        self.exercise_id.as_ref().map_or("", ExerciseId::as_str)
    }

    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn with_assessment_ids(mut self, ids: Vec<AssessmentItemId>) -> Self {
        self.assessment_ids = ids;
        self
    }

    #[must_use]
    pub fn randomized(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_pass_through_fields() {
        let exercise_id = ExerciseId::random();
        let user_id = UserId::random();
        let ctx = ExerciseContext::new(exercise_id.clone())
            .with_user(user_id.clone())
            .with_assessment_ids(vec![AssessmentItemId::new("a"), AssessmentItemId::new("b")])
            .randomized(true);

        assert_eq!(ctx.exercise_id, Some(exercise_id));
        assert_eq!(ctx.user_id, Some(user_id));
        assert_eq!(ctx.assessment_ids.len(), 2);
        assert!(ctx.randomize);
        assert_eq!(ctx.exercise_label(), ctx.exercise_id.as_ref().unwrap().as_str());
    }

    #[test]
    fn default_context_has_no_exercise() {
        let ctx = ExerciseContext::default();
        assert_eq!(ctx.exercise_id, None);
        assert_eq!(ctx.exercise_label(), "");
    }
}
