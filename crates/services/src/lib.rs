#![forbid(unsafe_code)]

pub mod error;
pub mod snapshot;
pub mod tracker;

pub use mastery_core::Clock;

pub use error::SnapshotError;
pub use snapshot::MasterySnapshot;
pub use tracker::{ExerciseProgress, MasteryTracker};
