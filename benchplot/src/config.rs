use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SIZES: [u64; 11] = [
    1, 10, 50, 100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 1_000_000,
];
pub const DEFAULT_ITERATIONS: u64 = 100_000;
pub const DEFAULT_EXECUTABLE: &str = "./benchmarks";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/*
 * Config holds everything a sweep needs. Every key is optional in the YAML
 * form and falls back to the defaults above.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sizes: Vec<u64>,
    pub iterations: u64,
    pub executable: PathBuf,
    pub output_dir: PathBuf,
    /// Per-trial limit in seconds, 0 disables it.
    pub timeout_secs: u64,
    pub font: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sizes: DEFAULT_SIZES.to_vec(),
            iterations: DEFAULT_ITERATIONS,
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            output_dir: PathBuf::from("."),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            font: None,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            bail!("At least one size must be specified");
        }
        if let Some(idx) = self.sizes.iter().position(|&size| size == 0) {
            bail!("sizes must be positive integers, got 0 at index {}", idx);
        }
        for pair in self.sizes.windows(2) {
            if pair[1] <= pair[0] {
                bail!(
                    "sizes must be strictly increasing, got {} after {}",
                    pair[1],
                    pair[0]
                );
            }
        }
        if self.iterations == 0 {
            bail!("iterations must be a positive integer");
        }
        Ok(())
    }

    /// Make every path absolute against `base`. Called once at startup so the
    /// driver never consults the process working directory.
    pub fn resolve(mut self, base: &Path) -> Self {
        self.executable = absolutize(base, &self.executable);
        self.output_dir = absolutize(base, &self.output_dir);
        self.font = self.font.map(|font| absolutize(base, &font));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Values given on the command line. Each one that is set replaces the
/// corresponding config value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub sizes: Option<Vec<u64>>,
    pub iterations: Option<u64>,
    pub executable: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub font: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(sizes) = self.sizes {
            config.sizes = sizes;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(executable) = self.executable {
            config.executable = executable;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if self.font.is_some() {
            config.font = self.font;
        }
        config
    }
}

/// Parse a comma separated size list such as `1,10,100`.
pub fn parse_sizes(list: &str) -> Result<Vec<u64>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.replace('_', "")
                .parse::<u64>()
                .with_context(|| format!("Invalid size: {}", item))
        })
        .collect()
}
