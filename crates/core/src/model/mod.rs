mod attempt;
mod context;
mod ids;
mod mastery;
mod session;

pub use ids::{AssessmentItemId, ExerciseId, ParseIdError, UserId};

pub use attempt::{AttemptLog, AttemptRecord};
pub use context::ExerciseContext;
pub use mastery::{M_OF_N, MasteryModel, MasteryModelDraft, MasteryModelError, MofN};
pub use session::SessionMasteryState;
