//! Task & TaskSet model: immutable per-task parameters and the CC-EDF invocation matrix.

pub mod prelude {
    pub use super::{
        Task,
        TaskSet,
        TaskSetError,
        InvocationMatrix,
        FcfsTask,
        FcfsTaskSet,
    };
}

/// A periodic task's period and worst-case execution time, with implicit deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub period: f64,
    pub wc_exec_time: f64,
}

impl Task {
    pub fn utilization(&self) -> f64 {
        self.wc_exec_time / self.period
    }
}

/// Immutable set of periodic tasks, validated at construction.
///
/// Invariants enforced by [`TaskSet::new`]: `N > 0`, `P_i > 0`, `0 < C_i <= P_i`.
#[derive(Debug, Clone)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(periods: Vec<f64>, wc_exec_time: Vec<f64>) -> Result<Self, TaskSetError> {
        if periods.is_empty() {
            return Err(TaskSetError::ZeroTasks);
        }
        if periods.len() != wc_exec_time.len() {
            return Err(TaskSetError::LengthMismatch {
                field: "wc_exec_time",
                expected: periods.len(),
                actual: wc_exec_time.len(),
            });
        }

        let tasks = periods
            .into_iter()
            .zip(wc_exec_time)
            .enumerate()
            .map(|(task_id, (period, wc_exec_time))| {
                if period <= 0.0 {
                    return Err(TaskSetError::NonPositivePeriod { task_id, period });
                }
                if wc_exec_time <= 0.0 || wc_exec_time > period {
                    return Err(TaskSetError::ExecTimeOutOfRange {
                        task_id,
                        wc_exec_time,
                        period,
                    });
                }
                Ok(Task { period, wc_exec_time })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tasks })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn periods(&self) -> Vec<f64> {
        self.tasks.iter().map(|t| t.period).collect()
    }

    pub fn wc_exec_times(&self) -> Vec<f64> {
        self.tasks.iter().map(|t| t.wc_exec_time).collect()
    }

    pub fn total_utilization(&self) -> f64 {
        self.tasks.iter().map(Task::utilization).sum()
    }
}

/// The `K x N` table of actual per-invocation execution times consumed by CC-EDF.
///
/// Row `k`, column `i` is the actual execution time of the k-th invocation of task `i`;
/// validated against the task set's worst-case execution times at construction.
#[derive(Debug, Clone)]
pub struct InvocationMatrix {
    rows: Vec<Vec<f64>>,
}

impl InvocationMatrix {
    pub fn new(rows: Vec<Vec<f64>>, taskset: &TaskSet) -> Result<Self, TaskSetError> {
        let n = taskset.len();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(TaskSetError::InvocationRowLength {
                    row: row_idx,
                    expected: n,
                    actual: row.len(),
                });
            }

            for (task_id, &invocation) in row.iter().enumerate() {
                let wc_exec_time = taskset.tasks()[task_id].wc_exec_time;
                if invocation < 0.0 || invocation > wc_exec_time {
                    return Err(TaskSetError::InvocationExceedsWcet {
                        row: row_idx,
                        task_id,
                        invocation,
                        wc_exec_time,
                    });
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn num_invocations(&self) -> usize {
        self.rows.len()
    }

    /// Actual execution time of the k-th invocation of task `i`.
    pub fn get(&self, k: usize, task_id: usize) -> f64 {
        self.rows[k][task_id]
    }
}

/// A single FCFS task: release time, worst-case execution time, and an optional deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FcfsTask {
    pub release_time: f64,
    pub wc_exec_time: f64,
    pub deadline: Option<f64>,
}

/// Immutable set of FCFS tasks, validated at construction.
#[derive(Debug, Clone)]
pub struct FcfsTaskSet {
    tasks: Vec<FcfsTask>,
}

impl FcfsTaskSet {
    pub fn new(
        release_time: Vec<f64>,
        wc_exec_time: Vec<f64>,
        deadlines: Option<Vec<f64>>,
    ) -> Result<Self, TaskSetError> {
        if release_time.is_empty() {
            return Err(TaskSetError::ZeroTasks);
        }
        if release_time.len() != wc_exec_time.len() {
            return Err(TaskSetError::LengthMismatch {
                field: "wc_exec_time",
                expected: release_time.len(),
                actual: wc_exec_time.len(),
            });
        }
        if let Some(deadlines) = &deadlines {
            if deadlines.len() != release_time.len() {
                return Err(TaskSetError::LengthMismatch {
                    field: "deadlines",
                    expected: release_time.len(),
                    actual: deadlines.len(),
                });
            }
        }

        let tasks = release_time
            .into_iter()
            .zip(wc_exec_time)
            .enumerate()
            .map(|(task_id, (release_time, wc_exec_time))| {
                if wc_exec_time <= 0.0 {
                    return Err(TaskSetError::NonPositiveExecTime { task_id, wc_exec_time });
                }
                Ok(FcfsTask {
                    release_time,
                    wc_exec_time,
                    deadline: deadlines.as_ref().map(|d| d[task_id]),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tasks })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[FcfsTask] {
        &self.tasks
    }
}

/// Invariant violated while constructing a [`TaskSet`], [`InvocationMatrix`] or [`FcfsTaskSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum TaskSetError {
    ZeroTasks,
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    NonPositivePeriod {
        task_id: usize,
        period: f64,
    },
    ExecTimeOutOfRange {
        task_id: usize,
        wc_exec_time: f64,
        period: f64,
    },
    NonPositiveExecTime {
        task_id: usize,
        wc_exec_time: f64,
    },
    InvocationRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    InvocationExceedsWcet {
        row: usize,
        task_id: usize,
        invocation: f64,
        wc_exec_time: f64,
    },
}

impl std::fmt::Display for TaskSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTasks =>
                write!(f, "task set must contain at least one task"),
            Self::LengthMismatch { field, expected, actual } =>
                write!(f, "field '{field}' has length {actual}, expected {expected}"),
            Self::NonPositivePeriod { task_id, period } =>
                write!(f, "task {task_id}: period must be positive, got {period}"),
            Self::ExecTimeOutOfRange { task_id, wc_exec_time, period } =>
                write!(f, "task {task_id}: wc_exec_time {wc_exec_time} must be in (0, {period}]"),
            Self::NonPositiveExecTime { task_id, wc_exec_time } =>
                write!(f, "task {task_id}: wc_exec_time must be positive, got {wc_exec_time}"),
            Self::InvocationRowLength { row, expected, actual } =>
                write!(f, "invocation row {row} has length {actual}, expected {expected}"),
            Self::InvocationExceedsWcet { row, task_id, invocation, wc_exec_time } =>
                write!(f, "invocation[{row}][{task_id}] = {invocation} exceeds wc_exec_time {wc_exec_time}"),
        }
    }
}

impl std::error::Error for TaskSetError {}
