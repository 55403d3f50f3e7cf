//! Dynamic collection of pending task instances, ordered by priority key.

pub mod prelude {
    pub use super::{ReadyEntry, ReadyQueue};
}

/// A pending task instance: which task, its priority key, and the work left on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadyEntry {
    pub task_id: usize,
    pub priority_key: f64,
    pub remaining: f64,
}

/// Small vector-backed queue of [`ReadyEntry`] values.
///
/// A heap is unnecessary for the tasksets this engine runs (`N < 32`); a flat
/// vector with linear scan also makes the tie-break rule and the duplicate-id
/// check trivial to express.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    entries: Vec<ReadyEntry>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ReadyEntry) {
        self.entries.push(entry);
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the entry with the minimal priority key.
    ///
    /// Ties are broken in favor of the entry that has executed the most so
    /// far, i.e. the largest `wc_exec_time[task_id] - remaining`. `wc_exec_time`
    /// is indexed by `task_id` and gives each task's (invocation-independent)
    /// worst-case execution time.
    pub fn pop_highest(&mut self, wc_exec_time: &[f64]) -> Option<ReadyEntry> {
        if self.entries.is_empty() {
            return None;
        }

        let mut best = 0;
        for i in 1..self.entries.len() {
            let candidate = self.entries[i];
            let current = self.entries[best];

            let take_candidate = if candidate.priority_key < current.priority_key {
                true
            } else if candidate.priority_key == current.priority_key {
                let candidate_progress = wc_exec_time[candidate.task_id] - candidate.remaining;
                let current_progress = wc_exec_time[current.task_id] - current.remaining;
                candidate_progress > current_progress
            } else {
                false
            };

            if take_candidate {
                best = i;
            }
        }

        Some(self.entries.remove(best))
    }

    /// The task id of the first duplicate entry found, if the "at most one
    /// entry per task" invariant has been violated.
    pub fn contains_duplicate_task_id(&self) -> Option<usize> {
        let mut seen = std::collections::HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !seen.insert(entry.task_id) {
                return Some(entry.task_id);
            }
        }
        None
    }
}
