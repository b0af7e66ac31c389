use anyhow::{Context, Result};
use benchplot::config::{parse_sizes, Config, Overrides};
use benchplot::version::{banner, VERSION};
use benchplot::{init_logging, Driver};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::path::PathBuf;

fn cli() -> Command<'static> {
    Command::new("benchplot")
        .version(VERSION)
        .about("Run an external benchmark over a range of sizes and plot the timings")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .action(ArgAction::Set)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("YAML config file"),
        )
        .arg(
            Arg::new("sizes")
                .short('s')
                .long("sizes")
                .action(ArgAction::Set)
                .value_name("N,N,...")
                .value_parser(value_parser!(String))
                .help("Comma separated list of input sizes"),
        )
        .arg(
            Arg::new("iterations")
                .short('n')
                .long("iterations")
                .action(ArgAction::Set)
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Iterations passed to every benchmark run"),
        )
        .arg(
            Arg::new("executable")
                .short('e')
                .long("executable")
                .action(ArgAction::Set)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Benchmark binary [default: ./benchmarks]"),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .action(ArgAction::Set)
                .value_name("DIRECTORY")
                .value_parser(value_parser!(PathBuf))
                .help("Where Find.png, Insert.png and Erase.png are written"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .action(ArgAction::Set)
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .help("Per-run time limit, 0 for none [default: 600]"),
        )
        .arg(
            Arg::new("font")
                .long("font")
                .action(ArgAction::Set)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("TrueType font used for chart text"),
        )
}

fn overrides(matches: &ArgMatches) -> Result<Overrides> {
    let sizes = match matches.get_one::<String>("sizes") {
        Some(list) => Some(parse_sizes(list)?),
        None => None,
    };

    Ok(Overrides {
        sizes,
        iterations: matches.get_one::<u64>("iterations").copied(),
        executable: matches.get_one::<PathBuf>("executable").cloned(),
        output_dir: matches.get_one::<PathBuf>("output-dir").cloned(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        font: matches.get_one::<PathBuf>("font").cloned(),
    })
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let base = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let cwd = env::current_dir().context("Failed to determine working directory")?;
    let config = overrides(matches)?.apply(base).resolve(&cwd);
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let matches = cli().get_matches();
    log::debug!("{}", banner());
    let config = load_config(&matches)?;
    log::debug!("config resolved {:#?}", config);

    let report = Driver::new(&config)?.run().await?;

    print!("{}", report.series);
    for chart in &report.charts {
        println!("chart: {}", chart.display());
    }

    eprintln!("\x1b[31mToo much info? Redirect stderr to devnull : 2>/dev/null\x1b[0m");
    Ok(())
}
