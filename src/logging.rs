//! Logging init: file under the platform data dir, or stderr when that fails.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,vortex=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file() -> io::Result<(fs::File, PathBuf)> {
    let dirs = crate::config::project_dirs()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let log_dir = dirs.data_local_dir().to_path_buf();
    fs::create_dir_all(&log_dir)?;

    let path = log_dir.join("vortex.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Installs the global subscriber. Logs go to `vortex.log` when the data dir is
/// writable and to stderr otherwise. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    match open_log_file() {
        Ok((file, path)) => {
            let writer = BoxMakeWriter::new(std::sync::Mutex::new(file));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            tracing::info!("vortex logging initialized at {}", path.display());
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .init();
            tracing::warn!("log file unavailable ({}), logging to stderr", e);
        }
    }
}
