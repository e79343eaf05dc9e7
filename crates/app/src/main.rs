//! Spendwise - offline personal expense tracker
//!
//! Interactive terminal front end over `spendwise-core`.

use clap::Parser;
use spendwise_core::{Config, Database};

mod cli;
mod display;
mod logging;
mod shell;

use cli::Cli;
use shell::{Result, Shell};

fn load_config(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&path)?;

    if let Some(database) = &cli.database {
        config.database_path = Some(database.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    logging::init(&config)?;

    let database_path = config.database_path()?;
    tracing::info!(path = %database_path.display(), "Starting Spendwise");
    let db = Database::open(&database_path)?;

    Shell::new(db, config).run()
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("spendwise: {}", e);
        std::process::exit(1);
    }
}
