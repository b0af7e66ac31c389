use crate::metric::Metric;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// The benchmark process could not be run to a clean exit.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to launch benchmark {}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect output of benchmark for size {size}")]
    Capture {
        size: u64,
        #[source]
        source: io::Error,
    },

    #[error("benchmark for size {size} exited with {status}")]
    Exit {
        size: u64,
        status: ExitStatus,
        stderr: String,
    },

    #[error("benchmark for size {size} did not finish within {}s", .timeout.as_secs_f64())]
    Timeout { size: u64, timeout: Duration },
}

/// An expected `<Label>: <number> us` line was absent from the output.
#[derive(Debug, Error)]
#[error("could not get {metric} time from benchmark output")]
pub struct MetricNotFound {
    pub metric: Metric,
    pub raw_output: String,
}

#[derive(Debug, Error)]
pub enum TrialError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("trial for size {size} produced incomplete output")]
    MetricNotFound {
        size: u64,
        #[source]
        source: MetricNotFound,
    },

    #[error("invalid metric pattern")]
    Pattern(#[from] regex::Error),
}
