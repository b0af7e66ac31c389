use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::error::Error;
use std::fmt;
use std::path::PathBuf;
use trial::{ExecutionError, Metric, Runner, Sample, TrialError};

/// Index-aligned timings collected over a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    sizes: Vec<u64>,
    find: Vec<f64>,
    insert: Vec<f64>,
    erase: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one complete trial. Every series grows by exactly one value.
    pub fn push(&mut self, size: u64, sample: Sample) {
        self.sizes.push(size);
        self.find.push(sample.find);
        self.insert.push(sample.insert);
        self.erase.push(sample.erase);
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Find => &self.find,
            Metric::Insert => &self.insert,
            Metric::Erase => &self.erase,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>10}  {:>12}  {:>12}  {:>12}",
            "size", "find (us)", "insert (us)", "erase (us)"
        )?;
        for i in 0..self.len() {
            writeln!(
                f,
                "{:>10}  {:>12}  {:>12}  {:>12}",
                self.sizes[i], self.find[i], self.insert[i], self.erase[i]
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Sweeping,
    Rendering,
    Done,
}

#[derive(Debug)]
pub struct Report {
    pub series: Series,
    pub charts: Vec<PathBuf>,
}

/*
 * Driver runs one trial per size, strictly in order, then renders the three
 * charts. Any failure stops it where it is; nothing is retried.
 */
#[derive(Debug)]
pub struct Driver {
    sizes: Vec<u64>,
    runner: Runner,
    renderer: ChartRenderer,
    phase: Phase,
}

impl Driver {
    /// `config` is expected to be validated and resolved already.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let runner = Runner::new(&config.executable, config.iterations, config.timeout())?;
        let renderer = ChartRenderer::new(&config.output_dir, config.font.as_deref())?;
        Ok(Self::with_parts(config.sizes.clone(), runner, renderer))
    }

    pub fn with_parts(sizes: Vec<u64>, runner: Runner, renderer: ChartRenderer) -> Self {
        Self {
            sizes,
            runner,
            renderer,
            phase: Phase::Sweeping,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run every trial, appending to `series`. On failure `series` holds the
    /// sizes that completed before it, still aligned.
    pub async fn sweep(&mut self, series: &mut Series) -> Result<(), Error> {
        log::info!(
            "sweeping {} sizes with {} ({} iterations)",
            self.sizes.len(),
            self.runner.executable().display(),
            self.runner.iterations()
        );
        for &size in &self.sizes {
            log::info!("Running benchmark for size {size}");

            let sample = match self.runner.run(size).await {
                Ok(sample) => sample,
                Err(err) => {
                    log_failure(&err);
                    return Err(err.into());
                }
            };
            log::debug!("size {size}: {sample:?}");
            series.push(size, sample);
        }

        self.phase = Phase::Rendering;
        Ok(())
    }

    /// Render one chart per metric. Refuses to run unless the sweep completed.
    pub fn render(&mut self, series: &Series) -> Result<Vec<PathBuf>, Error> {
        if self.phase != Phase::Rendering || series.len() != self.sizes.len() {
            return Err(Error::IncompleteSweep {
                completed: series.len(),
                expected: self.sizes.len(),
            });
        }

        let output_dir = self.renderer.output_dir();
        std::fs::create_dir_all(output_dir).map_err(|source| Error::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut charts = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            charts.push(
                self.renderer
                    .render(metric, series.sizes(), series.values(metric))?,
            );
        }

        self.phase = Phase::Done;
        Ok(charts)
    }

    pub async fn run(mut self) -> Result<Report, Error> {
        let mut series = Series::new();
        self.sweep(&mut series).await?;
        let charts = self.render(&series)?;
        Ok(Report { series, charts })
    }
}

fn log_failure(err: &TrialError) {
    match err {
        TrialError::MetricNotFound { size, source } => {
            log::error!("size {size}: {source}: {}", source.raw_output)
        }
        TrialError::Execution(ExecutionError::Exit { stderr, .. }) if !stderr.is_empty() => {
            log::error!("{err}: {stderr}")
        }
        _ => log::error!("{err}"),
    }
}
