//! Terminal rendering of the prayer board
//!
//! Redraws the whole board in place once per tick using ANSI cursor movement.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Write};

use colored::Colorize;
use terminal_size::{terminal_size, Width};
use unicode_width::UnicodeWidthStr;

use super::{DisplaySink, TextSlot};
use crate::types::{PrayerName, ResolvedPrayer};

#[derive(Debug, PartialEq)]
pub enum AnsiSequence {
    HideCursor,  // \x1b[?25l
    ShowCursor,  // \x1b[?25h
    MoveUp(u16), // \x1b[nA
    ClearLine,   // \x1b[2K
    ClearBelow,  // \x1b[J
}

impl fmt::Display for AnsiSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnsiSequence::HideCursor => write!(f, "\x1b[?25l"),
            AnsiSequence::ShowCursor => write!(f, "\x1b[?25h"),
            AnsiSequence::MoveUp(n) => write!(f, "\x1b[{}A", n),
            AnsiSequence::ClearLine => write!(f, "\x1b[2K"),
            AnsiSequence::ClearBelow => write!(f, "\x1b[J"),
        }
    }
}

/// Output buffer written to stdout in one go
pub struct TerminalBuffer {
    buffer: String,
}

impl Default for TerminalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBuffer {
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(4096),
        }
    }

    pub fn queue<D: fmt::Display>(&mut self, d: D) {
        use std::fmt::Write;
        let _ = write!(self.buffer, "{}", d);
    }

    pub fn flush(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(self.buffer.as_bytes())?;
        stdout.flush()?;
        self.buffer.clear();
        Ok(())
    }

    pub fn content(&self) -> &str {
        &self.buffer
    }
}

/// One card row
#[derive(Debug, Clone, PartialEq, Eq)]
struct Card {
    prayer: ResolvedPrayer,
}

/// Terminal implementation of [`DisplaySink`]
pub struct TerminalBoard {
    buffer: TerminalBuffer,
    width: u16,
    texts: HashMap<TextSlot, String>,
    cards: Vec<Card>,
    highlighted: HashSet<PrayerName>,
    last_line_count: u16,
    /// Set to false for tests so nothing reaches stdout
    write_stdout: bool,
}

impl Default for TerminalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBoard {
    pub fn new() -> Self {
        let width = match terminal_size() {
            Some((Width(w), _)) => w,
            None => 80, // デフォルト幅
        };

        Self {
            buffer: TerminalBuffer::new(),
            width,
            texts: HashMap::new(),
            cards: Vec::new(),
            highlighted: HashSet::new(),
            last_line_count: 0,
            write_stdout: true,
        }
    }

    #[cfg(test)]
    fn detached(width: u16) -> Self {
        Self {
            width,
            write_stdout: false,
            ..Self::new()
        }
    }

    fn text(&self, slot: TextSlot) -> &str {
        self.texts.get(&slot).map(String::as_str).unwrap_or("")
    }

    fn center(&self, plain: &str, styled: String) -> String {
        let width = UnicodeWidthStr::width(plain);
        let pad = (self.width as usize).saturating_sub(width) / 2;
        format!("{}{}", " ".repeat(pad), styled)
    }

    /// Build the board lines (styled)
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let clock = self.text(TextSlot::Clock);
        lines.push(self.center(clock, clock.bold().to_string()));

        let date = self.text(TextSlot::Date);
        lines.push(self.center(date, date.dimmed().to_string()));
        lines.push(String::new());

        for card in &self.cards {
            let prayer = &card.prayer;
            let plain = format!(
                "  {:<8} Adhan: {}   Iqamah: {}",
                prayer.name.label(),
                prayer.adhan,
                prayer.iqamah
            );
            let line = if self.highlighted.contains(&prayer.name) {
                format!("▶{}", plain).green().bold().to_string()
            } else {
                format!(" {}", plain)
            };
            lines.push(self.center(&format!(" {}", plain), line));
        }

        if !self.cards.is_empty() {
            lines.push(String::new());
        }

        let timer = self.text(TextSlot::Timer);
        lines.push(self.center(timer, timer.yellow().bold().to_string()));

        let error = self.text(TextSlot::ErrorMessage);
        if !error.is_empty() {
            lines.push(self.center(error, error.red().to_string()));
        }

        lines
    }

    fn redraw(&mut self) -> io::Result<()> {
        let lines = self.lines();

        self.buffer.queue(AnsiSequence::HideCursor);
        if self.last_line_count > 0 {
            self.buffer.queue(AnsiSequence::MoveUp(self.last_line_count));
        }
        for line in &lines {
            self.buffer.queue(AnsiSequence::ClearLine);
            self.buffer.queue(line);
            self.buffer.queue("\n");
        }
        // 前回より行数が減った場合の残りを消す
        self.buffer.queue(AnsiSequence::ClearBelow);
        self.buffer.queue(AnsiSequence::ShowCursor);
        self.last_line_count = lines.len() as u16;

        if self.write_stdout {
            self.buffer.flush()
        } else {
            Ok(())
        }
    }
}

impl DisplaySink for TerminalBoard {
    fn set_text(&mut self, slot: TextSlot, text: &str) {
        self.texts.insert(slot, text.to_string());
    }

    fn set_highlight(&mut self, prayer: PrayerName, highlighted: bool) {
        if highlighted {
            self.highlighted.insert(prayer);
        } else {
            self.highlighted.remove(&prayer);
        }
    }

    fn render_cards(&mut self, prayers: &[ResolvedPrayer]) {
        self.cards = prayers
            .iter()
            .map(|&prayer| Card { prayer })
            .collect();
    }

    fn flush(&mut self) {
        if let Err(e) = self.redraw() {
            tracing::warn!("failed to draw board: {}", e);
        }
    }
}
