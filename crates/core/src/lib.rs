//! Progress toward mastering a practice exercise.
//!
//! Hosts keep a [`SessionMasteryState`](model::SessionMasteryState) per
//! exercise run and call [`compute_progress`] whenever it changes.

#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;
pub mod time;

pub use error::Error;
pub use progress::{Progress, ProgressBreakdown, compute_progress, progress_breakdown};
pub use time::Clock;
