//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Spendwise - offline personal expense tracker
#[derive(Parser, Debug)]
#[command(name = "spendwise")]
#[command(
    version,
    about = "Track personal and recurring expenses from the terminal",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the config file
    #[arg(short = 'd', long = "database")]
    pub database: Option<PathBuf>,

    /// Log level or filter directive, overrides the config file
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from(["spendwise", "-d", "/tmp/x.db", "--log-level", "debug"]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.config.is_none());
    }
}
