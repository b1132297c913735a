//! Argument scanning.
//!
//! Flags are single-dash words (`-setp`, `-c1`, `-listc`), so arguments are
//! walked by hand rather than through a derive parser.

use crate::color::Rgb;
use crate::error::{PomoError, Result};
use crate::storage::Config;
use crate::timer::TimerMode;

pub const USAGE: &str = "\
Usage: pomo [start|break|end] [options]

Commands:
  start              Run a pomodoro (default)
  break              Run a break
  end                Stop the running timer

Options:
  -p N               Pomodoro length in minutes for this run
  -b N               Break length in minutes for this run
  -setp N            Save default pomodoro length
  -setb N            Save default break length
  -c1 #RRGGBB        Save text color
  -c2 #RRGGBB        Save accent color (digits, bar)
  -savec NAME        Save the current colors as a palette
  -loadc NAME        Make a saved palette the current colors
  -deletec NAME      Delete a saved palette
  -listc             List saved palettes
  -track             Publish live frames for `pomo -status`
  -status            Print the running timer's latest frame
  -h, --help         Show this help
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    Status,
    End,
    ListPalettes,
    SavePalette(String),
    LoadPalette(String),
    DeletePalette(String),
    /// Only persistent settings were given.
    SettingsSaved,
    Run(TimerMode),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub help: bool,
    pub mode: Option<TimerMode>,
    pub end: bool,
    pub status: bool,
    pub track: bool,
    pub pomodoro_override: Option<u32>,
    pub break_override: Option<u32>,
    pub set_pomodoro: Option<u32>,
    pub set_break: Option<u32>,
    pub color1: Option<Rgb>,
    pub color2: Option<Rgb>,
    pub save_palette: Option<String>,
    pub load_palette: Option<String>,
    pub delete_palette: Option<String>,
    pub list_palettes: bool,
}

pub fn parse<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut inv = Invocation::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| PomoError::MissingValue(arg.clone()));
        match arg.as_str() {
            "-h" | "--help" | "help" => inv.help = true,
            "start" | "break" => inv.mode = TimerMode::from_command(&arg),
            "end" => inv.end = true,
            "-status" => inv.status = true,
            "-track" => inv.track = true,
            "-listc" => inv.list_palettes = true,
            "-p" => inv.pomodoro_override = Some(parse_minutes(&value()?)?),
            "-b" => inv.break_override = Some(parse_minutes(&value()?)?),
            "-setp" => inv.set_pomodoro = Some(parse_minutes(&value()?)?),
            "-setb" => inv.set_break = Some(parse_minutes(&value()?)?),
            "-c1" => inv.color1 = Some(value()?.parse::<Rgb>()?),
            "-c2" => inv.color2 = Some(value()?.parse::<Rgb>()?),
            "-savec" => inv.save_palette = Some(value()?),
            "-loadc" => inv.load_palette = Some(value()?),
            "-deletec" => inv.delete_palette = Some(value()?),
            _ => return Err(PomoError::UnknownArgument(arg)),
        }
    }

    Ok(inv)
}

fn parse_minutes(text: &str) -> Result<u32> {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|m| *m > 0)
        .ok_or_else(|| PomoError::InvalidDuration(text.to_string()))
}

impl Invocation {
    fn changes_settings(&self) -> bool {
        self.set_pomodoro.is_some()
            || self.set_break.is_some()
            || self.color1.is_some()
            || self.color2.is_some()
    }

    pub fn action(&self) -> Action {
        if self.help {
            Action::Help
        } else if self.status {
            Action::Status
        } else if self.end {
            Action::End
        } else if self.list_palettes {
            Action::ListPalettes
        } else if let Some(name) = &self.save_palette {
            Action::SavePalette(name.clone())
        } else if let Some(name) = &self.load_palette {
            Action::LoadPalette(name.clone())
        } else if let Some(name) = &self.delete_palette {
            Action::DeletePalette(name.clone())
        } else if let Some(mode) = self.mode {
            Action::Run(mode)
        } else if self.changes_settings() {
            Action::SettingsSaved
        } else {
            Action::Run(TimerMode::Focus)
        }
    }

    /// Applies the persistent flags. Returns true when any were given and
    /// the config should be rewritten.
    pub fn apply_settings(&self, config: &mut Config) -> bool {
        if let Some(m) = self.set_pomodoro {
            config.pomodoro_minutes = m;
        }
        if let Some(m) = self.set_break {
            config.break_minutes = m;
        }
        if let Some(c) = self.color1 {
            config.fg1 = c;
        }
        if let Some(c) = self.color2 {
            config.fg2 = c;
        }
        self.changes_settings()
    }

    /// Length of this run: one-shot override, else the configured default.
    pub fn minutes_for(&self, mode: TimerMode, config: &Config) -> u32 {
        let override_minutes = match mode {
            TimerMode::Focus => self.pomodoro_override,
            TimerMode::Break => self.break_override,
        };
        override_minutes.unwrap_or_else(|| mode.configured_minutes(config))
    }
}
