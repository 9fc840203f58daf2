use std::path::PathBuf;

use clap::Parser;
use classbridge_cli::Options;

/// ClassBridge - run class-introspection requests against a fixture host
#[derive(Parser, Debug)]
#[command(name = "classbridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host fixture (JSON) to load classes and composites from
    #[arg(long)]
    fixture: PathBuf,

    /// Bridge configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single request instead of reading requests from stdin
    #[arg(long)]
    request: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout carries one JSON response per line.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        fixture: args.fixture,
        config: args.config,
        request: args.request,
    };
    if let Err(e) = classbridge_cli::run(&options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
