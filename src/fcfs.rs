//! Non-preemptive, release-ordered First-Come-First-Served engine.
//!
//! FCFS does not share the preemptive event loop: there is only one task
//! "in flight" at a time and no ready queue or priority policy involved.

use crate::prelude::*;
use ordered_float::OrderedFloat;

/// Runs tasks in ascending release-time order (ties broken by task index),
/// each running to completion before the next one starts.
pub fn run(taskset: &FcfsTaskSet) -> (Trace, Info) {
    let mut order: Vec<usize> = (0..taskset.len()).collect();
    order.sort_by_key(|&task_id| (OrderedFloat(taskset.tasks()[task_id].release_time), task_id));

    let mut trace = Trace::new();
    let mut info = Info { schedulability: Some(Schedulability::Yes), ..Info::default() };
    let mut current_time = 0.0f64;

    for task_id in order {
        let task = taskset.tasks()[task_id];
        let start = current_time.max(task.release_time);

        if let Some(deadline) = task.deadline {
            if start + task.wc_exec_time > deadline {
                trace.append(task_id, start, deadline, 1.0);
                info.schedulability = Some(Schedulability::No);
                info.missed_task_num = Some(task_id as u64 + 1);
                info.miss_occurance = Some(deadline);
                return (trace, info);
            }
        }

        let end = start + task.wc_exec_time;
        trace.append(task_id, start, end, 1.0);
        current_time = end;
    }

    (trace, info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fcfs_scenario_without_deadlines() {
        let taskset = FcfsTaskSet::new(
            vec![1.0, 3.0, 2.0, 15.0, 30.0],
            vec![2.0, 4.0, 5.0, 3.0, 9.0],
            None,
        ).unwrap();

        let (trace, info) = run(&taskset);

        let rows: Vec<(usize, f64, f64, f64)> =
            trace.segments().iter().map(|s| (s.task_id, s.start, s.end, s.frequency)).collect();

        assert_eq!(
            rows,
            vec![
                (0, 1.0, 3.0, 1.0),
                (2, 3.0, 8.0, 1.0),
                (1, 8.0, 12.0, 1.0),
                (3, 15.0, 18.0, 1.0),
                (4, 30.0, 39.0, 1.0),
            ]
        );
        assert_eq!(info.schedulability, Some(Schedulability::Yes));
        assert!(info.missed_task_num.is_none());
    }

    #[test]
    fn fcfs_law_holds_for_sorted_releases() {
        let taskset = FcfsTaskSet::new(vec![0.0, 5.0, 5.0], vec![2.0, 1.0, 1.0], None).unwrap();
        let (trace, _info) = run(&taskset);

        let segments = trace.segments();
        for i in 1..segments.len() {
            let release = taskset.tasks()[segments[i].task_id].release_time;
            assert_eq!(segments[i].start, segments[i - 1].end.max(release));
        }
    }

    #[test]
    fn fcfs_reports_missed_deadline_and_truncates() {
        let taskset = FcfsTaskSet::new(
            vec![0.0, 1.0],
            vec![5.0, 1.0],
            Some(vec![3.0, 10.0]),
        ).unwrap();

        let (trace, info) = run(&taskset);

        assert_eq!(trace.len(), 1);
        assert_eq!(info.schedulability, Some(Schedulability::No));
        assert_eq!(info.missed_task_num, Some(1));
        assert_eq!(info.miss_occurance, Some(3.0));
    }

    #[test]
    fn rejects_non_positive_exec_time() {
        let err = FcfsTaskSet::new(vec![0.0], vec![0.0], None).unwrap_err();
        assert!(matches!(err, TaskSetError::NonPositiveExecTime { task_id: 0, .. }));
    }
}
