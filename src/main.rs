// Entrypoint for the CLI application.
// - Keeps `main` small: resolve the document locations, install logging
//   and hand off to the interactive session.

use clap::Parser;
use magazzino::{ui, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "magazzino", about = "Interactive inventory manager", version)]
struct Cli {
    /// Inventory document (overrides MAGAZZINO_INVENTORY)
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Credential document (overrides MAGAZZINO_LOGIN)
    #[arg(long)]
    login: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise stay quiet unless --verbose.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().with_overrides(cli.inventory, cli.login);
    ui::run(&config)
}
