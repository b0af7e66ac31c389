use crate::error::{ExecutionError, TrialError};
use crate::metric::{MetricParser, Sample};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured output of a benchmark run that exited with status 0.
#[derive(Debug, Clone)]
pub struct TrialOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs the benchmark binary as `<executable> <size> <iterations>`.
#[derive(Debug, Clone)]
pub struct Runner {
    executable: PathBuf,
    iterations: u64,
    timeout: Option<Duration>,
    parser: MetricParser,
}

impl Runner {
    pub fn new(
        executable: impl Into<PathBuf>,
        iterations: u64,
        timeout: Option<Duration>,
    ) -> Result<Self, TrialError> {
        Ok(Self {
            executable: executable.into(),
            iterations,
            timeout,
            parser: MetricParser::new()?,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Spawn the benchmark for `size` and wait for it to exit.
    ///
    /// The child is killed if the timeout fires before it exits.
    pub async fn capture(&self, size: u64) -> Result<TrialOutput, ExecutionError> {
        log::debug!(
            "spawning {} {size} {}",
            self.executable.display(),
            self.iterations
        );
        let child = Command::new(&self.executable)
            .arg(size.to_string())
            .arg(self.iterations.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Launch {
                path: self.executable.clone(),
                source,
            })?;

        let res = match self.timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, child.wait_with_output()).await {
                    Ok(res) => res,
                    Err(_elapsed) => return Err(ExecutionError::Timeout { size, timeout }),
                }
            }
            None => child.wait_with_output().await,
        };
        let output = res.map_err(|source| ExecutionError::Capture { size, source })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(ExecutionError::Exit {
                size,
                status: output.status,
                stderr,
            });
        }

        Ok(TrialOutput { stdout, stderr })
    }

    /// Run one trial and extract its sample. Either all three metrics are
    /// returned or none are.
    pub async fn run(&self, size: u64) -> Result<Sample, TrialError> {
        let output = self.capture(size).await?;
        self.parser
            .parse(&output.stdout)
            .map_err(|source| TrialError::MetricNotFound { size, source })
    }
}
