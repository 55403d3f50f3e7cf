//! Per-algorithm priority and frequency-scaling policies plugged into the
//! shared preemptive event loop (`engine::run`).

pub mod prelude {
    pub use super::{Policy, ReleaseFlavor, RmPolicy, EdfPolicy, CcEdfPolicy};
}

use crate::prelude::*;

/// Which flavor of release just happened, distinguishing the row of the CC-EDF
/// invocation matrix to consume: the task nearest in the idle case reads
/// `period_counter[i]`, the task interrupting a running one reads
/// `period_counter[i] - 1` (its invocation was already due).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseFlavor {
    NearestIdle,
    Interrupting,
}

/// The four capabilities an algorithm plugs into the shared event loop.
pub trait Policy {
    fn initial_ready_queue(&self) -> ReadyQueue;

    /// How long `remaining` work takes to execute, and at what frequency.
    fn compute_frequency(&mut self, remaining: f64, task_id: usize) -> (f64, f64);

    /// The entry to insert when `task_id` is released.
    fn insert_on_release(
        &mut self,
        task_id: usize,
        period_counter: &[u64],
        flavor: ReleaseFlavor,
    ) -> ReadyEntry;

    /// Populates the info record; does not abort the run.
    fn check_schedulability(&self, info: &mut Info);

    /// Each task's period, indexed by task id.
    fn periods(&self) -> &[f64];

    /// Each task's worst-case execution time, indexed by task id; used by the
    /// ready queue's most-progress tie-break.
    fn wc_exec_time(&self) -> &[f64];

    /// `Some(T_end)` for RM/EDF; `None` for CC-EDF, which is bounded by invocation count instead.
    fn end_time(&self) -> Option<f64>;

    /// `Some(K)` for CC-EDF; `None` for RM/EDF, which are bounded by `end_time` instead.
    fn num_invocations(&self) -> Option<usize>;
}

/// Rate-Monotonic: priority key is the task's period, frequency always 1.
pub struct RmPolicy {
    taskset: TaskSet,
    periods: Vec<f64>,
    wc_exec_time: Vec<f64>,
    end_time: f64,
}

impl RmPolicy {
    pub fn new(taskset: TaskSet, end_time: f64) -> Self {
        let periods = taskset.periods();
        let wc_exec_time = taskset.wc_exec_times();
        Self { taskset, periods, wc_exec_time, end_time }
    }
}

impl Policy for RmPolicy {
    fn initial_ready_queue(&self) -> ReadyQueue {
        let mut queue = ReadyQueue::new();
        for (task_id, task) in self.taskset.tasks().iter().enumerate() {
            queue.insert(ReadyEntry {
                task_id,
                priority_key: task.period,
                remaining: task.wc_exec_time,
            });
        }
        queue
    }

    fn compute_frequency(&mut self, remaining: f64, _task_id: usize) -> (f64, f64) {
        (remaining, 1.0)
    }

    fn insert_on_release(
        &mut self,
        task_id: usize,
        _period_counter: &[u64],
        _flavor: ReleaseFlavor,
    ) -> ReadyEntry {
        let task = self.taskset.tasks()[task_id];
        ReadyEntry {
            task_id,
            priority_key: task.period,
            remaining: task.wc_exec_time,
        }
    }

    fn check_schedulability(&self, info: &mut Info) {
        info.schedulability = Some(crate::analysis::rate_monotonic_schedulability(
            &self.periods,
            &self.wc_exec_time,
        ));
    }

    fn periods(&self) -> &[f64] {
        &self.periods
    }

    fn wc_exec_time(&self) -> &[f64] {
        &self.wc_exec_time
    }

    fn end_time(&self) -> Option<f64> {
        Some(self.end_time)
    }

    fn num_invocations(&self) -> Option<usize> {
        None
    }
}

/// Earliest-Deadline-First: priority key is the instance's absolute deadline, frequency always 1.
pub struct EdfPolicy {
    taskset: TaskSet,
    periods: Vec<f64>,
    wc_exec_time: Vec<f64>,
    end_time: f64,
}

impl EdfPolicy {
    pub fn new(taskset: TaskSet, end_time: f64) -> Self {
        let periods = taskset.periods();
        let wc_exec_time = taskset.wc_exec_times();
        Self { taskset, periods, wc_exec_time, end_time }
    }
}

impl Policy for EdfPolicy {
    fn initial_ready_queue(&self) -> ReadyQueue {
        let mut queue = ReadyQueue::new();
        for (task_id, task) in self.taskset.tasks().iter().enumerate() {
            queue.insert(ReadyEntry {
                task_id,
                priority_key: task.period, // next_deadline at period_counter == 1
                remaining: task.wc_exec_time,
            });
        }
        queue
    }

    fn compute_frequency(&mut self, remaining: f64, _task_id: usize) -> (f64, f64) {
        (remaining, 1.0)
    }

    fn insert_on_release(
        &mut self,
        task_id: usize,
        period_counter: &[u64],
        _flavor: ReleaseFlavor,
    ) -> ReadyEntry {
        let task = self.taskset.tasks()[task_id];
        let next_deadline = task.period * (period_counter[task_id] + 1) as f64;
        ReadyEntry {
            task_id,
            priority_key: next_deadline,
            remaining: task.wc_exec_time,
        }
    }

    fn check_schedulability(&self, info: &mut Info) {
        info.schedulability = Some(crate::analysis::earliest_deadline_first_schedulability(
            &self.periods,
            &self.wc_exec_time,
        ));
    }

    fn periods(&self) -> &[f64] {
        &self.periods
    }

    fn wc_exec_time(&self) -> &[f64] {
        &self.wc_exec_time
    }

    fn end_time(&self) -> Option<f64> {
        Some(self.end_time)
    }

    fn num_invocations(&self) -> Option<usize> {
        None
    }
}

/// Cycle-Conservative EDF: priority key is the instance's absolute deadline,
/// frequency scaled down from a running best-case estimate.
pub struct CcEdfPolicy {
    taskset: TaskSet,
    periods: Vec<f64>,
    wc_exec_time: Vec<f64>,
    invocations: InvocationMatrix,
    bc_exec_time: Vec<f64>,
}

impl CcEdfPolicy {
    pub fn new(taskset: TaskSet, invocations: InvocationMatrix) -> Self {
        let periods = taskset.periods();
        let wc_exec_time = taskset.wc_exec_times();
        let bc_exec_time = wc_exec_time.clone();
        Self { taskset, periods, wc_exec_time, invocations, bc_exec_time }
    }
}

impl Policy for CcEdfPolicy {
    fn initial_ready_queue(&self) -> ReadyQueue {
        let mut queue = ReadyQueue::new();
        for (task_id, task) in self.taskset.tasks().iter().enumerate() {
            queue.insert(ReadyEntry {
                task_id,
                priority_key: task.period,
                remaining: self.invocations.get(0, task_id),
            });
        }
        queue
    }

    fn compute_frequency(&mut self, remaining: f64, task_id: usize) -> (f64, f64) {
        let prior = self.bc_exec_time[task_id];
        self.bc_exec_time[task_id] = self.wc_exec_time[task_id];

        let raw_freq: f64 = self
            .bc_exec_time
            .iter()
            .zip(self.periods.iter())
            .map(|(bc, period)| bc / period)
            .sum();
        let freq = raw_freq.min(1.0);

        let exec_time = remaining / freq;

        self.bc_exec_time[task_id] = if remaining < prior { remaining } else { prior };

        (exec_time, freq)
    }

    fn insert_on_release(
        &mut self,
        task_id: usize,
        period_counter: &[u64],
        flavor: ReleaseFlavor,
    ) -> ReadyEntry {
        let row = match flavor {
            ReleaseFlavor::NearestIdle => period_counter[task_id] as usize,
            ReleaseFlavor::Interrupting => period_counter[task_id] as usize - 1,
        };
        let next_deadline = self.periods[task_id] * (period_counter[task_id] + 1) as f64;

        ReadyEntry {
            task_id,
            priority_key: next_deadline,
            remaining: self.invocations.get(row, task_id),
        }
    }

    fn check_schedulability(&self, info: &mut Info) {
        info.warning = crate::analysis::cycle_conservative_edf_warning(
            &self.periods,
            &self.wc_exec_time,
        );
    }

    fn periods(&self) -> &[f64] {
        &self.periods
    }

    fn wc_exec_time(&self) -> &[f64] {
        &self.wc_exec_time
    }

    fn end_time(&self) -> Option<f64> {
        None
    }

    fn num_invocations(&self) -> Option<usize> {
        Some(self.invocations.num_invocations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rm_policy_initial_queue_uses_period_as_priority() {
        let taskset = TaskSet::new(vec![8.0, 5.0], vec![1.0, 2.0]).unwrap();
        let policy = RmPolicy::new(taskset, 15.0);
        let queue = policy.initial_ready_queue();
        assert_eq!(queue.size(), 2);
    }

    #[test]
    fn edf_policy_insert_on_release_uses_next_absolute_deadline() {
        let taskset = TaskSet::new(vec![10.0], vec![2.0]).unwrap();
        let mut policy = EdfPolicy::new(taskset, 100.0);
        let entry = policy.insert_on_release(0, &[1], ReleaseFlavor::NearestIdle);
        assert_eq!(entry.priority_key, 20.0);
        assert_eq!(entry.remaining, 2.0);
    }

    #[test]
    fn cc_edf_frequency_is_never_above_one() {
        let taskset = TaskSet::new(vec![8.0, 10.0, 14.0], vec![3.0, 3.0, 1.0]).unwrap();
        let invocations = InvocationMatrix::new(
            vec![vec![2.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]],
            &taskset,
        ).unwrap();
        let mut policy = CcEdfPolicy::new(taskset, invocations);

        let (_, freq) = policy.compute_frequency(2.0, 0);
        assert!(freq <= 1.0);
        assert!((freq - 0.7464285714285714).abs() < 1e-9);
    }

    #[test]
    fn cc_edf_frequency_clamps_at_one_when_saturated() {
        let taskset = TaskSet::new(vec![2.0], vec![2.0]).unwrap();
        let invocations = InvocationMatrix::new(vec![vec![2.0]], &taskset).unwrap();
        let mut policy = CcEdfPolicy::new(taskset, invocations);

        let (exec_time, freq) = policy.compute_frequency(2.0, 0);
        assert_eq!(freq, 1.0);
        assert_eq!(exec_time, 2.0);
    }
}
