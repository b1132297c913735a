//! Persisted defaults: active colors and timer lengths.
//!
//! The file is a list of `KEY=VALUE` lines. Loading is tolerant: unknown keys,
//! blank lines and malformed values are skipped and the field keeps its
//! default. Saving always rewrites all keys.

use super::{StorageRoot, write_file};
use crate::color::Rgb;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_POMODORO_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub pomodoro_minutes: u32,
    pub break_minutes: u32,
    /// Letters and words.
    pub fg1: Rgb,
    /// Digits, punctuation and the filled part of the bar.
    pub fg2: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pomodoro_minutes: DEFAULT_POMODORO_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            fg1: Rgb::WHITE,
            fg2: Rgb::CYAN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigKey {
    Color1,
    Color2,
    PomodoroMinutes,
    BreakMinutes,
}

/// Serialization order.
const SCHEMA: [ConfigKey; 4] = [
    ConfigKey::Color1,
    ConfigKey::Color2,
    ConfigKey::PomodoroMinutes,
    ConfigKey::BreakMinutes,
];

impl ConfigKey {
    fn name(self) -> &'static str {
        match self {
            ConfigKey::Color1 => "COLOR1",
            ConfigKey::Color2 => "COLOR2",
            ConfigKey::PomodoroMinutes => "POMO_MIN",
            ConfigKey::BreakMinutes => "BREAK_MIN",
        }
    }

    fn lookup(name: &str) -> Option<Self> {
        SCHEMA.into_iter().find(|k| k.name() == name)
    }

    fn render(self, config: &Config) -> String {
        match self {
            ConfigKey::Color1 => config.fg1.to_string(),
            ConfigKey::Color2 => config.fg2.to_string(),
            ConfigKey::PomodoroMinutes => config.pomodoro_minutes.to_string(),
            ConfigKey::BreakMinutes => config.break_minutes.to_string(),
        }
    }

    /// Returns false when the value is malformed and the field was left alone.
    fn apply(self, config: &mut Config, value: &str) -> bool {
        match self {
            ConfigKey::Color1 => Rgb::parse(value).map(|c| config.fg1 = c).is_ok(),
            ConfigKey::Color2 => Rgb::parse(value).map(|c| config.fg2 = c).is_ok(),
            ConfigKey::PomodoroMinutes => parse_minutes(value)
                .map(|m| config.pomodoro_minutes = m)
                .is_some(),
            ConfigKey::BreakMinutes => parse_minutes(value)
                .map(|m| config.break_minutes = m)
                .is_some(),
        }
    }
}

fn parse_minutes(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|m| *m > 0)
}

impl Config {
    pub fn parse(contents: &str) -> Self {
        let mut config = Config::default();
        for line in contents.lines() {
            let Some((name, value)) = line.trim().split_once('=') else {
                continue;
            };
            match ConfigKey::lookup(name.trim()) {
                Some(key) => {
                    if !key.apply(&mut config, value) {
                        tracing::debug!(key = key.name(), value, "ignoring malformed config value");
                    }
                }
                None => tracing::debug!(key = name, "ignoring unknown config key"),
            }
        }
        config
    }

    pub fn render(&self) -> String {
        SCHEMA
            .iter()
            .map(|key| format!("{}={}\n", key.name(), key.render(self)))
            .collect()
    }
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(storage: &StorageRoot) -> Self {
        Self {
            path: storage.config_file(),
        }
    }

    /// Missing or unreadable file yields defaults.
    pub fn load(&self) -> Config {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Config::parse(&contents),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "config unreadable, using defaults");
                }
                Config::default()
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        write_file(&self.path, &config.render())?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}
