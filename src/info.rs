//! The small, fixed-schema info record returned alongside a trace.

pub mod prelude {
    pub use super::{Info, Schedulability};
}

/// Algorithm-specific schedulability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedulability {
    Yes,
    Maybe,
    No,
}

/// Fixed-schema result metadata.
///
/// Modeled as a typed struct with `Option` fields rather than a dynamic map:
/// the key set is closed and known ahead of time, so a struct documents and
/// type-checks it instead of relying on string keys at every call site.
#[derive(Debug, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schedulability: Option<Schedulability>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub missed_task_num: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub miss_occurance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}
