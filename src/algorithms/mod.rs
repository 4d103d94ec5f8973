//! Implementation of search algorithms.
//!
//! These algorithms find paths on any [`Problem`](crate::problem::Problem),
//! and assignments on any [`CspProblem`](crate::csp::CspProblem).

pub mod backtracking;
pub mod best_first;
pub mod uninformed;

use thousands::Separable;

/// Logs how much work a finished search did.
pub(crate) fn log_summary(algorithm: &str, popped: usize, explored: usize, solved: bool) {
    log::debug!(
        "{algorithm} {} after popping {} nodes and exploring {} states",
        if solved { "succeeded" } else { "failed" },
        popped.separate_with_commas(),
        explored.separate_with_commas(),
    );
}
