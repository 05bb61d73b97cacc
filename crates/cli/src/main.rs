//! FormForge
//!
//! Command-line entry point for the form builder editing engine.

use formforge_cli::{Cli, Parser};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // RUST_LOG wins over the config file and -v flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter(&config)));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        store = %config.store_dir.display(),
        "starting {} v{}",
        formforge_cli::NAME,
        formforge_cli::VERSION
    );

    formforge_cli::run(cli, config)
}
