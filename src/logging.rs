//! Diagnostics go to `<root>/pomo.log`, never the terminal, since the timer
//! owns the screen. Filter with `POMO_LOG` (default `info`).
//!
//! Logging never creates the storage root. Events emitted before something
//! else has created it are dropped.

use crate::storage::StorageRoot;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "POMO_LOG";

pub fn init(storage: &StorageRoot) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let log = RootLogFile {
        root: storage.root().to_path_buf(),
        path: storage.log_file(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(move || log.clone())
        .try_init();
}

/// Appends to the log file, but only once the root directory exists.
#[derive(Debug, Clone)]
struct RootLogFile {
    root: PathBuf,
    path: PathBuf,
}

impl Write for RootLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.root.is_dir() {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
