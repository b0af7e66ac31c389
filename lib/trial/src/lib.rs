//! A single benchmark trial: spawn the external benchmark binary for one
//! input size, wait for it, and pull the `Find`, `Insert` and `Erase` timings
//! out of what it printed.

pub mod error;
pub mod exec;
pub mod metric;

pub use error::{ExecutionError, MetricNotFound, TrialError};
pub use exec::{Runner, TrialOutput};
pub use metric::{Metric, MetricParser, Sample};
