use std::io;
use std::path::PathBuf;
use thiserror::Error;
use trial::TrialError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Trial(#[from] TrialError),

    #[error("failed to render {chart} chart to {}: {reason}", .path.display())]
    ChartRender {
        chart: String,
        path: PathBuf,
        reason: String,
    },

    #[error("failed to load font {}", .path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid font file {}", .path.display())]
    InvalidFont { path: PathBuf },

    #[error("failed to create output directory {}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sweep incomplete: {completed} of {expected} sizes measured")]
    IncompleteSweep { completed: usize, expected: usize },
}
