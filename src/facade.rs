//! The single entry point dispatching a raw task-info record to the
//! matching algorithm and producing a trace plus info record.

use crate::prelude::*;

pub mod prelude {
    pub use super::{compute, ComputeError, ComputeInput, TaskInfo};
}

/// Raw, loosely-typed input as read from a taskset file: every field optional
/// at this layer so [`compute`] can raise a precise [`ComputeError`] instead
/// of bubbling up a generic deserialization failure.
#[derive(Debug, Clone, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TaskInfo {
    pub scheduling_algo: String,
    #[serde(default)]
    pub periods: Option<Vec<f64>>,
    #[serde(default)]
    pub wc_exec_time: Option<Vec<f64>>,
    #[serde(default)]
    pub invocations: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub release_time: Option<Vec<f64>>,
    #[serde(default)]
    pub deadlines: Option<Vec<f64>>,
}

/// Normalized, tagged request built from a [`TaskInfo`], one variant per
/// supported algorithm with exactly the parameters it needs.
#[derive(Debug, Clone)]
pub enum ComputeInput {
    Fcfs { taskset: FcfsTaskSet },
    RateMonotonic { taskset: TaskSet, end_time: f64 },
    EarliestDeadlineFirst { taskset: TaskSet, end_time: f64 },
    CycleConservativeEdf { taskset: TaskSet, invocations: InvocationMatrix },
}

impl TaskInfo {
    fn require_periods(&self) -> Result<Vec<f64>, ComputeError> {
        self.periods.clone().ok_or(ComputeError::MissingField("periods"))
    }

    fn require_wc_exec_time(&self) -> Result<Vec<f64>, ComputeError> {
        self.wc_exec_time.clone().ok_or(ComputeError::MissingField("wc_exec_time"))
    }

    fn require_end_time(&self) -> Result<f64, ComputeError> {
        self.end_time.ok_or(ComputeError::MissingField("end_time"))
    }

    /// Resolves this raw record into a tagged [`ComputeInput`], failing on a
    /// missing field or an unrecognized `scheduling_algo` value.
    pub fn normalize(&self) -> Result<ComputeInput, ComputeError> {
        match self.scheduling_algo.as_str() {
            "fcfs" => {
                let release_time = self
                    .release_time
                    .clone()
                    .ok_or(ComputeError::MissingField("release_time"))?;
                let wc_exec_time = self.require_wc_exec_time()?;
                let taskset = FcfsTaskSet::new(release_time, wc_exec_time, self.deadlines.clone())?;
                Ok(ComputeInput::Fcfs { taskset })
            }
            "rate_monotonic" => {
                let taskset = TaskSet::new(self.require_periods()?, self.require_wc_exec_time()?)?;
                Ok(ComputeInput::RateMonotonic { taskset, end_time: self.require_end_time()? })
            }
            "earliest_deadline_first" => {
                let taskset = TaskSet::new(self.require_periods()?, self.require_wc_exec_time()?)?;
                Ok(ComputeInput::EarliestDeadlineFirst { taskset, end_time: self.require_end_time()? })
            }
            "cycle_conservative_edf" => {
                let taskset = TaskSet::new(self.require_periods()?, self.require_wc_exec_time()?)?;
                let rows = self.invocations.clone().ok_or(ComputeError::MissingField("invocations"))?;
                let invocations = InvocationMatrix::new(rows, &taskset)?;
                Ok(ComputeInput::CycleConservativeEdf { taskset, invocations })
            }
            other => Err(ComputeError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Resolves and runs the algorithm named by `task_info.scheduling_algo`.
pub fn compute(task_info: &TaskInfo) -> Result<(Trace, Info), ComputeError> {
    match task_info.normalize()? {
        ComputeInput::Fcfs { taskset } => Ok(crate::fcfs::run(&taskset)),
        ComputeInput::RateMonotonic { taskset, end_time } => {
            Ok(crate::engine::run(RmPolicy::new(taskset, end_time)))
        }
        ComputeInput::EarliestDeadlineFirst { taskset, end_time } => {
            Ok(crate::engine::run(EdfPolicy::new(taskset, end_time)))
        }
        ComputeInput::CycleConservativeEdf { taskset, invocations } => {
            Ok(crate::engine::run(CcEdfPolicy::new(taskset, invocations)))
        }
    }
}

/// Everything that can go wrong resolving and dispatching a [`TaskInfo`].
#[derive(Debug)]
pub enum ComputeError {
    InvalidTaskSet(TaskSetError),
    MissingField(&'static str),
    UnknownAlgorithm(String),
}

impl From<TaskSetError> for ComputeError {
    fn from(err: TaskSetError) -> Self {
        Self::InvalidTaskSet(err)
    }
}

impl std::fmt::Display for ComputeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTaskSet(err) => write!(f, "invalid task set: {err}"),
            Self::MissingField(field) => write!(f, "missing required field '{field}'"),
            Self::UnknownAlgorithm(name) => write!(f, "unknown scheduling_algo '{name}'"),
        }
    }
}

impl std::error::Error for ComputeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTaskSet(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rm_task_info() -> TaskInfo {
        TaskInfo {
            scheduling_algo: "rate_monotonic".to_string(),
            periods: Some(vec![8.0, 5.0, 10.0]),
            wc_exec_time: Some(vec![1.0, 2.0, 2.0]),
            end_time: Some(15.0),
            ..Default::default()
        }
    }

    #[test]
    fn compute_dispatches_rate_monotonic() {
        let (trace, info) = compute(&rm_task_info()).unwrap();
        assert_eq!(trace.len(), 7);
        assert_eq!(info.schedulability, Some(Schedulability::Yes));
    }

    #[test]
    fn compute_dispatches_fcfs() {
        let task_info = TaskInfo {
            scheduling_algo: "fcfs".to_string(),
            release_time: Some(vec![1.0, 3.0, 2.0]),
            wc_exec_time: Some(vec![2.0, 4.0, 5.0]),
            ..Default::default()
        };
        let (trace, info) = compute(&task_info).unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(info.schedulability, Some(Schedulability::Yes));
    }

    #[test]
    fn compute_rejects_unknown_algorithm() {
        let task_info = TaskInfo { scheduling_algo: "round_robin".to_string(), ..Default::default() };
        let err = compute(&task_info).unwrap_err();
        assert!(matches!(err, ComputeError::UnknownAlgorithm(name) if name == "round_robin"));
    }

    #[test]
    fn compute_rejects_missing_field() {
        let task_info = TaskInfo { scheduling_algo: "rate_monotonic".to_string(), ..Default::default() };
        let err = compute(&task_info).unwrap_err();
        assert!(matches!(err, ComputeError::MissingField("periods")));
    }

    #[test]
    fn compute_propagates_invalid_taskset() {
        let task_info = TaskInfo {
            scheduling_algo: "rate_monotonic".to_string(),
            periods: Some(vec![0.0]),
            wc_exec_time: Some(vec![1.0]),
            end_time: Some(10.0),
            ..Default::default()
        };
        let err = compute(&task_info).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidTaskSet(TaskSetError::NonPositivePeriod { .. })));
    }
}
