use crate::error::MetricNotFound;
use regex::Regex;
use std::fmt;

/// One of the operations timed by the benchmark binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Find,
    Insert,
    Erase,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Find, Metric::Insert, Metric::Erase];

    /// Label as printed by the benchmark, also used for chart titles and file names.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Find => "Find",
            Metric::Insert => "Insert",
            Metric::Erase => "Erase",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Find => "find",
            Metric::Insert => "insert",
            Metric::Erase => "erase",
        }
    }

    fn pattern(self) -> String {
        format!(r"{}: (\d+\.?\d*) us", self.label())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Timings in microseconds from a single trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub find: f64,
    pub insert: f64,
    pub erase: f64,
}

impl Sample {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Find => self.find,
            Metric::Insert => self.insert,
            Metric::Erase => self.erase,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricParser {
    find: Regex,
    insert: Regex,
    erase: Regex,
}

impl MetricParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            find: Regex::new(&Metric::Find.pattern())?,
            insert: Regex::new(&Metric::Insert.pattern())?,
            erase: Regex::new(&Metric::Erase.pattern())?,
        })
    }

    fn regex(&self, metric: Metric) -> &Regex {
        match metric {
            Metric::Find => &self.find,
            Metric::Insert => &self.insert,
            Metric::Erase => &self.erase,
        }
    }

    /// Value of the first `<Label>: <number> us` line for `metric`, or `None` if
    /// the output has no such line.
    pub fn extract(&self, metric: Metric, text: &str) -> Option<f64> {
        let captures = self.regex(metric).captures(text)?;
        // Digit runs too long for an f64 parse to infinity.
        captures
            .get(1)?
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Extracts all three metrics. Fails on the first one that is missing.
    pub fn parse(&self, text: &str) -> Result<Sample, MetricNotFound> {
        let require = |metric: Metric| {
            self.extract(metric, text).ok_or_else(|| MetricNotFound {
                metric,
                raw_output: text.to_string(),
            })
        };

        Ok(Sample {
            find: require(Metric::Find)?,
            insert: require(Metric::Insert)?,
            erase: require(Metric::Erase)?,
        })
    }
}
