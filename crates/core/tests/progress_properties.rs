//! Property tests for the m-of-n progress law.
//!
//! - Cap: `correct >= m` is full progress
//! - Linearity: below the cap progress is `correct / m`
//! - Order independence: permutations do not change the result
//! - Monotonicity: appending correct never lowers, appending incorrect never changes

use mastery_core::compute_progress;
use mastery_core::model::{AttemptLog, AttemptRecord, MasteryModel};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_model() -> impl Strategy<Value = MasteryModel> {
    (1u32..=10)
        .prop_flat_map(|m| (Just(m), m..=m + 10))
        .prop_map(|(m, n)| MasteryModel::m_of_n(m, n).expect("generated model is valid"))
}

fn arb_outcomes() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..40)
}

fn log_of(outcomes: &[bool]) -> AttemptLog {
    outcomes.iter().copied().map(AttemptRecord::new).collect()
}

fn attempts(outcomes: &[bool]) -> u32 {
    u32::try_from(outcomes.len()).unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn empty_log_is_always_zero(model in arb_model(), total in 0u32..100) {
        prop_assert_eq!(compute_progress(&AttemptLog::new(), total, &model).value(), 0.0);
    }

    #[test]
    fn progress_stays_in_unit_interval(model in arb_model(), outcomes in arb_outcomes()) {
        let value = compute_progress(&log_of(&outcomes), attempts(&outcomes), &model).value();
        prop_assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn cap_and_linearity(model in arb_model(), outcomes in arb_outcomes()) {
        let m = model.required_correct();
        let correct = u32::try_from(outcomes.iter().filter(|c| **c).count()).unwrap();
        let value = compute_progress(&log_of(&outcomes), attempts(&outcomes), &model).value();

        if outcomes.is_empty() {
            prop_assert_eq!(value, 0.0);
        } else if correct >= m {
            prop_assert_eq!(value, 1.0);
        } else {
            prop_assert_eq!(value, f64::from(correct) / f64::from(m));
        }
    }

    #[test]
    fn order_does_not_matter(
        model in arb_model(),
        (outcomes, shuffled) in arb_outcomes().prop_flat_map(|o| (Just(o.clone()), Just(o).prop_shuffle())),
    ) {
        let total = attempts(&outcomes);
        prop_assert_eq!(
            compute_progress(&log_of(&outcomes), total, &model),
            compute_progress(&log_of(&shuffled), total, &model)
        );
    }

    #[test]
    fn appending_correct_never_decreases(model in arb_model(), outcomes in arb_outcomes()) {
        let mut log = log_of(&outcomes);
        let before = compute_progress(&log, attempts(&outcomes), &model);
        log.push(AttemptRecord::correct());
        let after = compute_progress(&log, attempts(&outcomes) + 1, &model);
        prop_assert!(after >= before);
    }

    #[test]
    fn appending_incorrect_never_changes(
        model in arb_model(),
        outcomes in prop::collection::vec(any::<bool>(), 1..40),
    ) {
        let mut log = log_of(&outcomes);
        let before = compute_progress(&log, attempts(&outcomes), &model);
        log.push(AttemptRecord::incorrect());
        let after = compute_progress(&log, attempts(&outcomes) + 1, &model);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn attempt_counter_does_not_affect_result(
        model in arb_model(),
        outcomes in arb_outcomes(),
        a in 0u32..100,
        b in 0u32..100,
    ) {
        let log = log_of(&outcomes);
        prop_assert_eq!(compute_progress(&log, a, &model), compute_progress(&log, b, &model));
    }
}

// ============================================================================
// Exhaustive grid
// ============================================================================

/// Every small m-of-n model against every attempt count up to `n + 1`: a log
/// of `m - k` incorrect, `k` correct, then the remaining attempts incorrect.
#[test]
fn small_model_grid_matches_correct_over_m() {
    for n in 1..6_u32 {
        for m in 1..=n {
            let model = MasteryModel::m_of_n(m, n).unwrap();
            for total in 0..=n + 1 {
                for k in 0..=m {
                    let mut outcomes = vec![false; (m - k) as usize];
                    outcomes.extend(std::iter::repeat_n(true, k as usize));
                    outcomes.extend(std::iter::repeat_n(false, total.saturating_sub(m) as usize));

                    let progress = compute_progress(&log_of(&outcomes), total, &model);
                    assert_eq!(
                        progress.value(),
                        f64::from(k) / f64::from(m),
                        "m={m} n={n} total={total} correct={k}"
                    );
                }
            }
        }
    }
}
