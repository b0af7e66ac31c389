pub mod chart;
pub mod config;
pub mod error;
pub mod sweep;
pub mod version;

pub use config::Config;
pub use error::Error;
pub use sweep::{Driver, Phase, Report, Series};

pub fn init_logging() {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("BENCHPLOT_LOG")
        .init();
}
