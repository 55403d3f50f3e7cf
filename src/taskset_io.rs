//! Reads a [`TaskInfo`] record from a JSON taskset file.

use crate::prelude::*;

pub mod prelude {
    pub use super::{read_task_info, TaskInfoParseError};
}

pub fn read_task_info(path: &str) -> Result<TaskInfo, TaskInfoParseError> {
    let data = std::fs::read_to_string(path)?;
    let task_info = serde_json::from_str(&data)?;
    Ok(task_info)
}

#[derive(Debug)]
pub enum TaskInfoParseError {
    IOError(std::io::Error),
    JSONError(serde_json::Error),
}

impl From<std::io::Error> for TaskInfoParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err)
    }
}

impl From<serde_json::Error> for TaskInfoParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::JSONError(err)
    }
}

impl std::fmt::Display for TaskInfoParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "taskset parse error, ")?;
        match self {
            Self::IOError(err) => write!(f, "IO: {err}"),
            Self::JSONError(err) => write!(f, "JSON: {err}"),
        }
    }
}

impl std::error::Error for TaskInfoParseError {}
