use anyhow::Result;
use clap::Parser;
use helmcred::constants;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = helmcred::cli::Cli::parse();
    init_tracing(cli.verbose);
    cli.run()
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "helmcred=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(constants::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
