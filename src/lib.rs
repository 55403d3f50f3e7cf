pub mod prelude {
    pub use super::model::prelude::*;
    pub use super::ready_queue::prelude::*;
    pub use super::trace::prelude::*;
    pub use super::info::prelude::*;
    pub use super::analysis::prelude::*;
    pub use super::policy::prelude::*;
    pub use super::facade::prelude::*;
    pub use super::taskset_io::prelude::*;
}

pub mod model;
pub mod ready_queue;
pub mod trace;
pub mod info;
pub mod analysis;
pub mod policy;
pub mod engine;
pub mod fcfs;
pub mod facade;
pub mod taskset_io;
