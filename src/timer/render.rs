//! Frame rendering and the terminal display.

use crate::color::{RESET, Rgb};
use std::io::{self, Write};

pub const BAR_LEN: u64 = 40;

const FILLED: char = '█';
const EMPTY: char = '░';

/// One fully rendered display state. Each line already carries its color
/// escapes, so consumers print it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: String,
    pub countdown: String,
    pub bar: String,
}

impl Frame {
    /// Text written to the status file.
    pub fn snapshot(&self) -> String {
        format!("{}\n{}\n{}\n", self.header, self.countdown, self.bar)
    }
}

/// One countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub elapsed: u64,
    pub total: u64,
}

impl Tick {
    pub fn remaining(&self) -> u64 {
        self.total - self.elapsed
    }

    /// Filled bar cells, truncated so the bar is only full at zero remaining.
    pub fn filled(&self) -> u64 {
        if self.total == 0 {
            return BAR_LEN;
        }
        self.elapsed * BAR_LEN / self.total
    }
}

/// Ticks from `elapsed == 0` through `elapsed == total` inclusive.
#[derive(Debug, Clone)]
pub struct Countdown {
    total: u64,
    next: Option<u64>,
}

impl Countdown {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total: total_secs,
            next: Some(0),
        }
    }
}

impl Iterator for Countdown {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let elapsed = self.next?;
        self.next = (elapsed < self.total).then_some(elapsed + 1);
        Some(Tick {
            elapsed,
            total: self.total,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub fg1: Rgb,
    pub fg2: Rgb,
}

impl Renderer {
    pub fn header(&self, label: &str, start: &str, end: &str) -> String {
        format!(
            "{}{}: {}{} - {}{}",
            self.fg1.fg(),
            label,
            self.fg2.fg(),
            start,
            end,
            RESET
        )
    }

    /// Digits in `fg2`, everything else in `fg1`. Escapes are only emitted
    /// when the color changes.
    pub fn countdown(&self, minutes: u32, tick: &Tick) -> String {
        let remaining = tick.remaining();
        let plain = format!(
            "{} minute(s) - {}m{}s",
            minutes,
            remaining / 60,
            remaining % 60
        );

        let mut out = String::with_capacity(plain.len() * 4);
        let mut current = None;
        for ch in plain.chars() {
            let color = if ch.is_ascii_digit() { self.fg2 } else { self.fg1 };
            if current != Some(color) {
                out.push_str(&color.fg());
                current = Some(color);
            }
            out.push(ch);
        }
        out.push_str(RESET);
        out
    }

    pub fn bar(&self, tick: &Tick) -> String {
        let filled = tick.filled() as usize;
        let empty = BAR_LEN as usize - filled;
        format!(
            "{}{}{}{}{}",
            self.fg2.fg(),
            FILLED.to_string().repeat(filled),
            self.fg1.fg(),
            EMPTY.to_string().repeat(empty),
            RESET
        )
    }
}

/// Where frames go while the timer runs.
pub trait DisplaySink {
    /// Called once before the first frame with the fixed header line.
    fn begin(&mut self, header: &str) -> io::Result<()>;
    fn draw(&mut self, frame: &Frame) -> io::Result<()>;
    /// Restores the display. Runs on every exit path.
    fn finish(&mut self) -> io::Result<()>;
}

const CLEAR_LINE: &str = "\x1b[2K";
const CURSOR_UP_2: &str = "\x1b[2A";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_SCREEN: &str = "\x1bc";

/// Draws the header once and redraws the two live lines in place.
pub struct TerminalSink<W: Write> {
    out: W,
    drawn: bool,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: false }
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn begin(&mut self, header: &str) -> io::Result<()> {
        writeln!(self.out, "{}{}{}", HIDE_CURSOR, CLEAR_SCREEN, header)?;
        self.out.flush()
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        if self.drawn {
            write!(self.out, "{}", CURSOR_UP_2)?;
        }
        writeln!(
            self.out,
            "{}{}\n{}{}",
            CLEAR_LINE, frame.countdown, CLEAR_LINE, frame.bar
        )?;
        self.drawn = true;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        write!(self.out, "{}{}", RESET, SHOW_CURSOR)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERER: Renderer = Renderer {
        fg1: Rgb::WHITE,
        fg2: Rgb::CYAN,
    };

    fn strip_escapes(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[test]
    fn countdown_yields_one_tick_per_second_plus_final() {
        for minutes in [1u64, 2, 25] {
            let ticks: Vec<Tick> = Countdown::new(minutes * 60).collect();
            assert_eq!(ticks.len() as u64, 60 * minutes + 1);
            assert_eq!(ticks.first().unwrap().remaining(), minutes * 60);
            assert_eq!(ticks.last().unwrap().remaining(), 0);
            for pair in ticks.windows(2) {
                assert_eq!(pair[0].remaining(), pair[1].remaining() + 1);
            }
        }
    }

    #[test]
    fn bar_fill_is_monotonic_and_full_only_at_end() {
        let ticks: Vec<Tick> = Countdown::new(25 * 60).collect();
        assert_eq!(ticks[0].filled(), 0);
        assert_eq!(ticks.last().unwrap().filled(), BAR_LEN);
        for pair in ticks.windows(2) {
            assert!(pair[0].filled() <= pair[1].filled());
        }
        assert!(ticks[ticks.len() - 2].filled() < BAR_LEN);
    }

    #[test]
    fn bar_uses_truncation() {
        // 59 of 60 seconds is 39.33 cells
        let tick = Tick {
            elapsed: 59,
            total: 60,
        };
        assert_eq!(tick.filled(), 39);
    }

    #[test]
    fn countdown_text_and_colors() {
        let tick = Tick {
            elapsed: 65,
            total: 25 * 60,
        };
        let line = RENDERER.countdown(25, &tick);
        assert_eq!(strip_escapes(&line), "25 minute(s) - 23m55s");
        assert!(line.starts_with(&Rgb::CYAN.fg()));
        assert!(line.ends_with(RESET));
        assert!(line.contains(&format!("{} minute(s) - ", Rgb::WHITE.fg())));
    }

    #[test]
    fn bar_has_forty_cells() {
        let tick = Tick {
            elapsed: 30,
            total: 60,
        };
        let bar = strip_escapes(&RENDERER.bar(&tick));
        assert_eq!(bar.chars().count(), BAR_LEN as usize);
        assert_eq!(bar.chars().filter(|c| *c == FILLED).count(), 20);
    }

    #[test]
    fn header_shows_label_and_times() {
        let header = RENDERER.header("Break", "09:00", "09:05");
        assert_eq!(strip_escapes(&header), "Break: 09:00 - 09:05");
    }

    #[test]
    fn terminal_sink_redraws_in_place() {
        let frame = Frame {
            header: "H".into(),
            countdown: "C".into(),
            bar: "B".into(),
        };
        let mut buf = Vec::new();
        {
            let mut sink = TerminalSink::new(&mut buf);
            sink.begin(&frame.header).unwrap();
            sink.draw(&frame).unwrap();
            sink.draw(&frame).unwrap();
            sink.finish().unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with(HIDE_CURSOR));
        assert_eq!(out.matches(CURSOR_UP_2).count(), 1);
        assert!(out.ends_with(SHOW_CURSOR));
    }
}
