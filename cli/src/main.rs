use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

fn main() {
    if let Err(error) = run() {
        eprintln!("gc-stream error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = args::Cli::parse();
    init_tracing(cli.verbose)?;
    commands::dispatch(cli.command, cli.catalog.as_deref())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialise tracing subscriber: {error}"))
}
