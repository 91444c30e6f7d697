use clap::Parser;
use tracing_subscriber::EnvFilter;

use modcheck::cli::{self, CliArgs};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,modcheck=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    if let Err(e) = cli::run(args).await {
        eprintln!("ERROR: {e}");
        std::process::exit(2);
    }
}
