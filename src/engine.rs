//! The shared preemptive event-driven simulation loop, generic over a [`Policy`].

use crate::prelude::*;

/// Runs the event-driven loop to completion against the given policy, producing
/// the execution trace and the info record (schedulability verdict plus any
/// deadline-miss metadata).
///
/// Each iteration either advances `current_time` to the next release (idle
/// case), or lets the running task consume CPU time up to either its own
/// completion or the next release, whichever comes first (preemption).
pub fn run<P: Policy>(mut policy: P) -> (Trace, Info) {
    let num_tasks = policy.periods().len();

    let mut info = Info::default();
    policy.check_schedulability(&mut info);

    let mut period_counter = vec![1u64; num_tasks];
    let mut inv_counter = vec![0u64; num_tasks];
    let mut queue = policy.initial_ready_queue();
    let mut trace = Trace::new();
    let mut current_time = 0.0f64;

    loop {
        if is_done(current_time, &inv_counter, policy.end_time(), policy.num_invocations()) {
            break;
        }

        let next_deadlines: Vec<f64> = (0..num_tasks)
            .map(|i| policy.periods()[i] * period_counter[i] as f64)
            .collect();

        match queue.pop_highest(policy.wc_exec_time()) {
            None => {
                let nearest = argmin(&next_deadlines);
                let has_more_invocations = match policy.num_invocations() {
                    Some(k) => (inv_counter[nearest] as usize) < k,
                    None => true,
                };

                if has_more_invocations {
                    current_time = next_deadlines[nearest];
                    let entry = policy.insert_on_release(nearest, &period_counter, ReleaseFlavor::NearestIdle);
                    queue.insert(entry);
                }

                // Advances unconditionally so the idle clock still progresses
                // toward `end_time`/exit even once `nearest` has no invocations left.
                period_counter[nearest] += 1;
            }
            Some(running) => {
                let (exec, freq) = policy.compute_frequency(running.remaining, running.task_id);
                let task_end_time = current_time + exec;

                let preempted = next_deadlines.iter().any(|&deadline| task_end_time >= deadline);

                if !preempted {
                    trace.append(running.task_id, current_time, task_end_time, freq);
                    current_time = task_end_time;
                    inv_counter[running.task_id] += 1;
                } else {
                    let interrupting = argmin(&next_deadlines);
                    let release_time = next_deadlines[interrupting];
                    let remaining_after = (task_end_time - release_time) * freq;

                    let has_more_invocations = match policy.num_invocations() {
                        Some(k) => (inv_counter[interrupting] as usize) < k,
                        None => true,
                    };
                    if has_more_invocations {
                        let entry = policy.insert_on_release(interrupting, &period_counter, ReleaseFlavor::Interrupting);
                        queue.insert(entry);
                    }
                    period_counter[interrupting] += 1;

                    if remaining_after > 0.0 {
                        queue.insert(ReadyEntry {
                            task_id: running.task_id,
                            priority_key: running.priority_key,
                            remaining: remaining_after,
                        });
                    } else {
                        inv_counter[running.task_id] += 1;
                    }

                    let missed_task = queue.contains_duplicate_task_id();
                    if let Some(task_id) = missed_task {
                        info.missed_task_num = Some(task_id as u64 + 1);
                        info.miss_occurance = Some(release_time);
                    }

                    trace.append(running.task_id, current_time, release_time, freq);
                    current_time = release_time;

                    if missed_task.is_some() {
                        break;
                    }
                }
            }
        }
    }

    (trace, info)
}

fn is_done(current_time: f64, inv_counter: &[u64], end_time: Option<f64>, num_invocations: Option<usize>) -> bool {
    if let Some(end_time) = end_time {
        return current_time >= end_time;
    }
    if let Some(k) = num_invocations {
        return inv_counter.iter().all(|&c| c as usize >= k);
    }
    true
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for i in 1..values.len() {
        if values[i] < values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(trace: &Trace) -> Vec<(usize, f64, f64, f64)> {
        trace.segments().iter().map(|s| (s.task_id, s.start, s.end, s.frequency)).collect()
    }

    #[test]
    fn rm_small_scenario() {
        let taskset = TaskSet::new(vec![8.0, 5.0, 10.0], vec![1.0, 2.0, 2.0]).unwrap();
        let policy = RmPolicy::new(taskset, 15.0);
        let (trace, info) = run(policy);

        assert_eq!(
            segments(&trace),
            vec![
                (1, 0.0, 2.0, 1.0),
                (0, 2.0, 3.0, 1.0),
                (2, 3.0, 5.0, 1.0),
                (1, 5.0, 7.0, 1.0),
                (0, 8.0, 9.0, 1.0),
                (1, 10.0, 12.0, 1.0),
                (2, 12.0, 14.0, 1.0),
            ]
        );
        assert_eq!(info.schedulability, Some(Schedulability::Yes));
    }

    #[test]
    fn rm_four_task_long_horizon_scenario() {
        let taskset = TaskSet::new(vec![25.0, 35.0, 60.0, 105.0], vec![5.0, 8.0, 20.0, 15.0]).unwrap();
        let policy = RmPolicy::new(taskset, 100.0);
        let (trace, _info) = run(policy);

        assert_eq!(trace.len(), 16);
        assert_eq!(
            segments(&trace),
            vec![
                (0, 0.0, 5.0, 1.0),
                (1, 5.0, 13.0, 1.0),
                (2, 13.0, 25.0, 1.0),
                (0, 25.0, 30.0, 1.0),
                (2, 30.0, 35.0, 1.0),
                (1, 35.0, 43.0, 1.0),
                (2, 43.0, 46.0, 1.0),
                (3, 46.0, 50.0, 1.0),
                (0, 50.0, 55.0, 1.0),
                (3, 55.0, 60.0, 1.0),
                (2, 60.0, 70.0, 1.0),
                (1, 70.0, 75.0, 1.0),
                (0, 75.0, 80.0, 1.0),
                (1, 80.0, 83.0, 1.0),
                (2, 83.0, 93.0, 1.0),
                (3, 93.0, 99.0, 1.0),
            ]
        );
    }

    #[test]
    fn rm_merging_scenario_respects_merge_invariant() {
        let taskset = TaskSet::new(vec![8.0, 15.0, 20.0, 22.0], vec![1.0, 3.0, 4.0, 6.0]).unwrap();
        let policy = RmPolicy::new(taskset, 55.0);
        let (trace, _info) = run(policy);

        assert_eq!(trace.len(), 20);
        for window in trace.segments().windows(2) {
            let (a, b) = (window[0], window[1]);
            assert!(!(a.task_id == b.task_id && a.end == b.start && a.frequency == b.frequency));
            assert!(a.end <= b.start);
        }
    }

    #[test]
    fn edf_scenario() {
        let taskset = TaskSet::new(vec![50.0, 40.0, 30.0], vec![12.0, 10.0, 10.0]).unwrap();
        let policy = EdfPolicy::new(taskset, 120.0);
        let (trace, info) = run(policy);

        assert_eq!(trace.len(), 11);
        assert_eq!(
            &segments(&trace)[..4],
            &[
                (2, 0.0, 10.0, 1.0),
                (1, 10.0, 20.0, 1.0),
                (0, 20.0, 32.0, 1.0),
                (2, 32.0, 42.0, 1.0),
            ]
        );
        assert_eq!(info.schedulability, Some(Schedulability::Yes));
    }

    #[test]
    fn cc_edf_scenario() {
        let taskset = TaskSet::new(vec![8.0, 10.0, 14.0], vec![3.0, 3.0, 1.0]).unwrap();
        let invocations = InvocationMatrix::new(
            vec![vec![2.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]],
            &taskset,
        ).unwrap();
        let policy = CcEdfPolicy::new(taskset, invocations);
        let (trace, info) = run(policy);

        assert_eq!(trace.len(), 6);

        let first = trace.segments()[0];
        assert_eq!(first.task_id, 0);
        assert!((first.start - 0.0).abs() < 1e-6);
        assert!((first.end - 2.6794).abs() < 1e-3);
        assert!((first.frequency - 0.7464).abs() < 1e-3);

        for segment in trace.segments() {
            assert!(segment.frequency <= 1.0);
        }
        assert!(info.warning.is_none());
    }

    #[test]
    fn deadline_miss_truncates_trace_and_records_info() {
        // Two tasks with equal, very tight periods guarantee a miss quickly.
        let taskset = TaskSet::new(vec![2.0, 2.0], vec![2.0, 2.0]).unwrap();
        let policy = RmPolicy::new(taskset, 100.0);
        let (_trace, info) = run(policy);

        assert!(info.missed_task_num.is_some());
        assert!(info.miss_occurance.is_some());
    }
}
