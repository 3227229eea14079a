use clap::Parser;
use drainage_prep::config::{self, PrepConfig};
use drainage_prep::logging;
use drainage_prep::pipeline;
use drainage_prep::report;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drainage-prep")]
#[command(
    about = "Derive upstream drainage mappings for gauged basins from a river-network segment table",
    long_about = None
)]
struct Cli {
    /// Path to the segment table (segment id, downstream target, gauge tag)
    #[arg(long)]
    segments: Option<String>,

    /// Path to the basin query list (one segment id per line); defaults to
    /// every gauged segment in the table
    #[arg(long)]
    basins: Option<String>,

    /// Output artifact path
    #[arg(long)]
    output: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the mapping as JSON instead of key-value text
    #[arg(long)]
    json: bool,

    /// Run the network invariant checks before traversal
    #[arg(long)]
    verify: bool,

    /// Minimum log level (debug, info, warn, error)
    #[arg(long, env = "DRAINAGE_PREP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Append log output to this file
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => config::load_config(path)?,
        None => PrepConfig::default(),
    };

    // CLI flags override file values.
    if cli.segments.is_some() {
        config.segments_path = cli.segments;
    }
    if cli.basins.is_some() {
        config.basins_path = cli.basins;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if cli.json {
        config.json_output = true;
    }
    if cli.verify {
        config.verify = true;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }

    logging::init_logger(
        config::parse_log_level(&config.log_level),
        config.log_file.as_deref(),
        true,
    );

    let summary = pipeline::run(&config)?;
    report::print_summary(&summary);

    Ok(())
}
