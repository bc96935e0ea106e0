use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use target_whatagraph::config::Config;
use target_whatagraph::observability::TracingObserver;

/// Export CSV/TSV files to Whatagraph.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file
    #[arg(short, long)]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_path(&args.config)?;
    tracing::info!(config = %args.config.display(), input = %config.input_path.display(), "starting export");

    target_whatagraph::run(&config, Arc::new(TracingObserver))?;
    Ok(())
}
