//! Display utilities for one-shot CLI output
//!
//! Prints the day's prayer table and the board state for `salat show`.

use colored::Colorize;

use crate::board::BoardSnapshot;
use crate::display::{format_date_fr, format_timer};
use crate::types::ResolvedPrayer;

/// Display handler for CLI output
#[derive(Debug, Default)]
pub struct Display;

impl Display {
    /// Create a new Display instance
    pub fn new() -> Self {
        Self
    }

    /// Lines for the day's table and current state
    pub fn day_lines(
        &self,
        date: chrono::NaiveDate,
        cards: &[ResolvedPrayer],
        snapshot: &BoardSnapshot,
    ) -> Vec<String> {
        let mut lines = vec![
            format!("=== {} ===", format_date_fr(date)).bold().to_string(),
            format!("  {:<8} {:>5}  {:>6}", "", "Adhan", "Iqamah"),
        ];

        for card in cards {
            let row = format!(
                "{:<8} {:>5}  {:>6}",
                card.name.label(),
                card.adhan.to_string(),
                card.iqamah.to_string()
            );
            if card.name == snapshot.highlighted {
                lines.push(format!("{} {}", "▶".green().bold(), row.green().bold()));
            } else {
                lines.push(format!("  {}", row));
            }
        }

        lines.push(String::new());
        lines.push(format_timer(&snapshot.state).yellow().bold().to_string());
        if snapshot.next_is_tomorrow {
            // Next prayer is tomorrow's Fajr
            lines.push(
                format!("Fajr demain: {}", snapshot.next_adhan)
                    .dimmed()
                    .to_string(),
            );
        }
        lines
    }

    /// Print the day's table and current state
    pub fn show_day(
        &self,
        date: chrono::NaiveDate,
        cards: &[ResolvedPrayer],
        snapshot: &BoardSnapshot,
    ) {
        for line in self.day_lines(date, cards, snapshot) {
            println!("{}", line);
        }
    }

    /// Show error message
    pub fn show_error(&self, msg: &str) {
        eprintln!("{} {}", "✗".red().bold(), msg.red());
    }
}
