//! Text formatting for the board (French, as shown in the prayer hall)

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

use crate::types::DisplayState;

/// Timer text while no schedule is loaded
pub const RECONNECTING_TEXT: &str = "Reconnexion aux horaires...";

/// Error text shown when a schedule load fails
pub const LOAD_ERROR_TEXT: &str = "Impossible de charger les horaires. Nouvel essai dans une minute.";

const DAYS_FR: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

const MONTHS_FR: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Countdown split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// Remaining time (seconds), never negative
    pub total_seconds: u64,
}

impl Countdown {
    pub fn new(remaining: TimeDelta) -> Self {
        Self {
            total_seconds: remaining.num_seconds().max(0) as u64,
        }
    }

    /// `MM:SS`, minutes are not wrapped into hours
    pub fn format_minutes(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.total_seconds / 60,
            self.total_seconds % 60
        )
    }

    /// `H:MM:SS`
    pub fn format_hours(&self) -> String {
        let h = self.total_seconds / 3600;
        let m = (self.total_seconds % 3600) / 60;
        let s = self.total_seconds % 60;
        format!("{}:{:02}:{:02}", h, m, s)
    }
}

/// Clock line, `HH:MM:SS`
pub fn format_clock(now: NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Date line, e.g. `Mardi 24 Février 2026`
pub fn format_date_fr(date: NaiveDate) -> String {
    let day = DAYS_FR[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS_FR[date.month0() as usize];
    format!("{} {:02} {} {}", day, date.day(), month, date.year())
}

/// Timer line for the current display state
pub fn format_timer(state: &DisplayState) -> String {
    match state {
        DisplayState::AwaitingIqamah { prayer, remaining } => {
            format!(
                "Iqamah {}: {}",
                prayer.label(),
                Countdown::new(*remaining).format_minutes()
            )
        }
        DisplayState::InProgress { prayer } => format!("Salat {}", prayer.label()),
        DisplayState::AwaitingNextAdhan { prayer, remaining } => {
            format!(
                "Prochaine: {} dans {}",
                prayer.label(),
                Countdown::new(*remaining).format_hours()
            )
        }
    }
}
