//! Tracing setup
//!
//! Everything at the configured level goes to the log file; only warnings and
//! errors reach stderr so the menu stays readable.

use std::fs::OpenOptions;
use std::sync::Mutex;

use spendwise_core::{Config, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init(config: &Config) -> Result<()> {
    let log_path = config.log_file()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    // RUST_LOG wins over the configured level
    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        )
        .init();

    tracing::debug!(path = %log_path.display(), "Logging initialized");
    Ok(())
}
