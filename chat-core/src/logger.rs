//! Tracing initialization: one fmt subscriber writing to stdout and an
//! append-only log file.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// The log level comes from `RUST_LOG` (e.g. `info`, `debug`); defaults to
/// `info` when unset. Load `.env` (e.g. `dotenvy::dotenv()`) before calling
/// this, otherwise `RUST_LOG` from the file is not picked up.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stdout.and(Arc::new(file)))
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
