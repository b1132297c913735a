use crate::storage::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "start" => Some(TimerMode::Focus),
            "break" => Some(TimerMode::Break),
            _ => None,
        }
    }

    /// Header label.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Pomodoro",
            TimerMode::Break => "Break",
        }
    }

    pub fn done_message(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Done! Time for a break.",
            TimerMode::Break => "Break over! Back to work.",
        }
    }

    pub fn configured_minutes(&self, config: &Config) -> u32 {
        match self {
            TimerMode::Focus => config.pomodoro_minutes,
            TimerMode::Break => config.break_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_modes() {
        assert_eq!(TimerMode::from_command("start"), Some(TimerMode::Focus));
        assert_eq!(TimerMode::from_command("break"), Some(TimerMode::Break));
        assert_eq!(TimerMode::from_command("end"), None);
    }

    #[test]
    fn minutes_follow_config() {
        let config = Config {
            pomodoro_minutes: 40,
            break_minutes: 8,
            ..Config::default()
        };
        assert_eq!(TimerMode::Focus.configured_minutes(&config), 40);
        assert_eq!(TimerMode::Break.configured_minutes(&config), 8);
    }
}
