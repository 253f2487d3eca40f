use thiserror::Error;

use crate::model::{MasteryModelError, ParseIdError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    MasteryModel(#[from] MasteryModelError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExerciseId, MasteryModel};

    fn parse_model_for(exercise: &str, m: u32, n: u32) -> Result<(ExerciseId, MasteryModel), Error> {
        let id = exercise.parse::<ExerciseId>()?;
        let model = MasteryModel::m_of_n(m, n)?;
        Ok((id, model))
    }

    #[test]
    fn wraps_model_errors() {
        let err = parse_model_for("exercise-1", 3, 2).unwrap_err();
        assert!(matches!(err, Error::MasteryModel(_)));
        assert_eq!(
            err.to_string(),
            "window size n (2) must be >= required correct count m (3)"
        );
    }

    #[test]
    fn wraps_id_errors() {
        let err = parse_model_for("  ", 1, 1).unwrap_err();
        assert!(matches!(err, Error::ParseId(_)));
    }
}
