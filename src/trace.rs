//! Output trace: time-ordered execution segments with contiguous-block merging.

pub mod prelude {
    pub use super::{Segment, Trace};
}

/// One contiguous slice of CPU time given to a task, at a given frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub task_id: usize,
    pub start: f64,
    pub end: f64,
    pub frequency: f64,
}

/// Ordered, non-overlapping sequence of [`Segment`]s, built incrementally.
///
/// [`Trace::append`] merges a new segment into the most recent one when they
/// are contiguous in time, same task, same frequency; empty segments
/// (`start == end`) are silently dropped rather than emitted.
#[derive(Debug, Clone, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Trace {
    segments: Vec<Segment>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, task_id: usize, start: f64, end: f64, frequency: f64) {
        if !(start < end) {
            return;
        }

        if let Some(last) = self.segments.last_mut() {
            if last.task_id == task_id && last.frequency == frequency && last.end == start {
                last.end = end;
                return;
            }
        }

        self.segments.push(Segment { task_id, start, end, frequency });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
