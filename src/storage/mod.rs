//! File-backed state shared between pomo invocations.
//!
//! Every file lives under one per-user root (default `~/.config/pomo`):
//!
//! - `config`: active colors and default durations
//! - `colors/<name>`: saved palettes
//! - `pid`: process id of the running timer
//! - `status`: last rendered frame, only while tracking
//! - `pomo.log`: diagnostics
//!
//! Directories are created on first write. Tests point `StorageRoot::with_root`
//! at a temp dir.

pub mod colors;
pub mod config;

pub use colors::ColorStore;
pub use config::{Config, ConfigStore};

use crate::error::{PomoError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const APP_DIR: &str = "pomo";

#[derive(Debug, Clone)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    /// `$XDG_CONFIG_HOME/pomo`, falling back to the platform config dir and
    /// then `~/.config/pomo`.
    pub fn resolve() -> Self {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"));
        Self::with_root(base.join(APP_DIR))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn colors_dir(&self) -> PathBuf {
        self.root.join("colors")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.root.join("pid")
    }

    pub fn status_file(&self) -> PathBuf {
        self.root.join("status")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("pomo.log")
    }
}

fn ensure_parent(path: &Path) -> Result<&Path> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| PomoError::io_at("creating", dir, e))?;
    Ok(dir)
}

/// Full overwrite in place. Readers may observe a partially written file.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, contents).map_err(|e| PomoError::io_at("writing", path, e))
}

/// Writes to a sibling temp file and renames it over `path`, so readers see
/// either the old contents or the new ones.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = ensure_parent(path)?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| PomoError::io(format!("creating temp file in {}", dir.display()), e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| PomoError::io(format!("writing temp file for {}", path.display()), e))?;
    tmp.persist(path)
        .map_err(|e| PomoError::io_at("replacing", path, e.error))?;
    Ok(())
}

/// Removes `path`, treating a missing file as success.
pub fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PomoError::io_at("removing", path, e)),
    }
}
