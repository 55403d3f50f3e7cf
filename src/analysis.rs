//! Schedulability Analyzer: utilization-based feasibility bounds.
//!
//! One free function per named bound: each takes the task parameter slices
//! directly and returns the verdict its algorithm needs.

pub mod prelude {
    pub use super::{
        total_utilization,
        rate_monotonic_lub,
        rate_monotonic_schedulability,
        earliest_deadline_first_schedulability,
        cycle_conservative_edf_warning,
    };
}

use crate::prelude::Schedulability;

/// `U = sum(C_i / P_i)` over the task set.
pub fn total_utilization(periods: &[f64], wc_exec_time: &[f64]) -> f64 {
    periods.iter().zip(wc_exec_time).map(|(period, wc)| wc / period).sum()
}

/// Liu & Layland 1973, Theorem 5: `lub(U) = N * (2^(1/N) - 1)`.
pub fn rate_monotonic_lub(num_tasks: usize) -> f64 {
    (num_tasks as f64) * (2f64.powf(1.0 / num_tasks as f64) - 1.0)
}

/// `yes` if `U <= lub(U)`, `maybe` otherwise (RM's sufficient-but-not-necessary bound).
pub fn rate_monotonic_schedulability(periods: &[f64], wc_exec_time: &[f64]) -> Schedulability {
    let utilization = total_utilization(periods, wc_exec_time);
    let bound = rate_monotonic_lub(periods.len());

    if utilization <= bound {
        Schedulability::Yes
    } else {
        Schedulability::Maybe
    }
}

/// `yes` if `U <= 1`, `no` otherwise (necessary and sufficient for EDF with implicit deadlines).
pub fn earliest_deadline_first_schedulability(periods: &[f64], wc_exec_time: &[f64]) -> Schedulability {
    if total_utilization(periods, wc_exec_time) <= 1.0 {
        Schedulability::Yes
    } else {
        Schedulability::No
    }
}

/// `Some(message)` when the worst-case utilization exceeds 1, under which CC-EDF
/// clamps frequency at 1 and can no longer scale down to conserve energy.
pub fn cycle_conservative_edf_warning(periods: &[f64], wc_exec_time: &[f64]) -> Option<String> {
    if total_utilization(periods, wc_exec_time) > 1.0 {
        Some("worst-case utilization exceeds 1".to_string())
    } else {
        None
    }
}
