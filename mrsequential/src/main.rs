use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use map_reduce::{Config, Driver, TransformRegistry};

/// Run a map/reduce transform over input files in a single process
#[derive(Parser)]
#[command(name = "mrsequential")]
#[command(about = "Sequential MapReduce over a set of input files", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output file (default: mr-out-0)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// List the registered transforms and exit
    #[arg(long)]
    list: bool,

    /// Transform to run, by name (wc) or plugin path (../mrapps/wc.so)
    #[arg(required_unless_present = "list")]
    transform: Option<String>,

    /// Input files, read in the order given
    #[arg(required_unless_present = "list")]
    inputs: Vec<PathBuf>,
}

fn registry() -> TransformRegistry {
    let mut registry = TransformRegistry::new();
    registry
        .register(&["wc", "word_count"], word_count::transform())
        .register(&["indexer", "inverted_index"], inverted_index::transform());
    registry
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let registry = registry();
    if cli.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }
    debug!(?config, "loaded configuration");

    let identifier = cli.transform.context("missing transform argument")?;
    let transform = registry.resolve(&identifier)?;

    let mut driver = Driver::new(transform, config);
    let summary = driver
        .run(&cli.inputs)
        .with_context(|| format!("map/reduce with {identifier} failed"))?;

    info!(
        inputs = summary.inputs,
        records = summary.intermediate_records,
        keys = summary.keys,
        output = %summary.output.display(),
        "done"
    );
    Ok(())
}
