use crate::error::{PomoError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
        .expect("hex color pattern is valid")
});

pub const RESET: &str = "\x1b[0m";

/// 24-bit color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const CYAN: Rgb = Rgb::new(0x00, 0xCC, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `RRGGBB` or `#RRGGBB`, case-insensitive.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let captures = HEX_COLOR
            .captures(text)
            .ok_or_else(|| PomoError::InvalidColor(text.to_string()))?;
        let channel = |i: usize| u8::from_str_radix(&captures[i], 16);
        match (channel(1), channel(2), channel(3)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self { r, g, b }),
            _ => Err(PomoError::InvalidColor(text.to_string())),
        }
    }

    /// Escape sequence selecting this color as the terminal foreground.
    pub fn fg(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = PomoError;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(Rgb::parse("#112233").unwrap(), Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(Rgb::parse("00ccff").unwrap(), Rgb::CYAN);
    }

    #[test]
    fn display_round_trips_hex_digits() {
        for input in ["#a1B2c3", "FFFFFF", "#000000", "0f0F0f"] {
            let rgb = Rgb::parse(input).unwrap();
            let digits = input.trim_start_matches('#');
            assert_eq!(&rgb.to_string()[1..], digits.to_ascii_uppercase().as_str());
            assert_eq!(Rgb::parse(&rgb.to_string()).unwrap(), rgb);
        }
    }

    #[test]
    fn every_channel_value_round_trips() {
        for v in 0..=255u8 {
            for rgb in [Rgb::new(v, 0, 0), Rgb::new(0, v, 0), Rgb::new(0, 0, v), Rgb::new(v, v, v)] {
                let text = rgb.to_string();
                assert_eq!(text.len(), 7);
                assert_eq!(text.parse::<Rgb>().unwrap(), rgb);
                assert_eq!(Rgb::parse(&text[1..].to_ascii_lowercase()).unwrap(), rgb);
            }
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "#12345", "#1234567", "zzzzzz", "##112233", "#11 223"] {
            assert!(
                matches!(Rgb::parse(input), Err(PomoError::InvalidColor(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn fg_emits_true_color_escape() {
        assert_eq!(Rgb::new(1, 2, 3).fg(), "\x1b[38;2;1;2;3m");
    }
}
