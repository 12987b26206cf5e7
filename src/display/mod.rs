//! Display sink for the prayer board
//!
//! The board engine only talks to a [`DisplaySink`]: named text slots plus a
//! highlight toggle per prayer. Sinks may ignore slots they do not render.

pub mod format;
pub mod terminal;

use crate::types::{PrayerName, ResolvedPrayer};

pub use format::{format_clock, format_date_fr, format_timer, Countdown};
pub use terminal::TerminalBoard;

/// Named text slots on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Clock,
    Date,
    Timer,
    ErrorMessage,
}

impl TextSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextSlot::Clock => "clock",
            TextSlot::Date => "date",
            TextSlot::Timer => "timer",
            TextSlot::ErrorMessage => "error-message",
        }
    }
}

/// Where the board engine writes its output
pub trait DisplaySink {
    /// Update a text slot
    fn set_text(&mut self, slot: TextSlot, text: &str);

    /// Toggle the highlight of one prayer card
    fn set_highlight(&mut self, prayer: PrayerName, highlighted: bool);

    /// Replace the prayer cards (called after each successful load)
    fn render_cards(&mut self, _prayers: &[ResolvedPrayer]) {}

    /// End of tick
    fn flush(&mut self) {}
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn set_text(&mut self, slot: TextSlot, text: &str) {
        (**self).set_text(slot, text)
    }

    fn set_highlight(&mut self, prayer: PrayerName, highlighted: bool) {
        (**self).set_highlight(prayer, highlighted)
    }

    fn render_cards(&mut self, prayers: &[ResolvedPrayer]) {
        (**self).render_cards(prayers)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}
