//! Error types for pomo.
//!
//! Persistence failures are reported through `Io` but most callers log and
//! continue with in-memory values. Only the user-facing variants end an
//! invocation with exit code 1.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum PomoError {
    // ─────────────────────────────────────────────────────────────────────
    // Palettes
    // ─────────────────────────────────────────────────────────────────────
    #[error("Palette not found: {0}")]
    PaletteNotFound(String),

    #[error("Invalid palette name: {0:?}")]
    InvalidPaletteName(String),

    // ─────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────
    #[error("No active session")]
    NoActiveSession,

    #[error("No active timer")]
    NoActiveTimer,

    // ─────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid color {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("Invalid duration {0:?} (expected a positive number of minutes)")]
    InvalidDuration(String),

    #[error("Unknown arg: {0}")]
    UnknownArgument(String),

    #[error("Missing value for {0}")]
    MissingValue(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PomoError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PomoError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        PomoError::Io {
            context: format!("{} {}", action, path.display()),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PomoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = PomoError::io_at(
            "writing",
            Path::new("/tmp/pomo/config"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("writing /tmp/pomo/config"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn unknown_argument_matches_usage_hint_prefix() {
        let err = PomoError::UnknownArgument("--bogus".to_string());
        assert_eq!(err.to_string(), "Unknown arg: --bogus");
    }
}
