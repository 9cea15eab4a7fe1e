//! Termweave CLI entry point.
//!
//! This binary provides the `termweave` command for building iTerm2 tab and
//! split-pane layouts from YAML configuration.

use clap::Parser;
use termweave::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = termweave::app::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing. Respects the RUST_LOG env var, falling back to the
/// `--log-level` flag.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
