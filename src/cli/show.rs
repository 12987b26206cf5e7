//! One-shot evaluation for `salat show`

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};

use crate::board::{BoardSnapshot, PrayerStateEngine};
use crate::cli::ShowArgs;
use crate::config::BoardConfig;
use crate::schedule::load_daily;
use crate::types::ResolvedPrayer;

/// Result of a one-shot evaluation
#[derive(Debug, Clone)]
pub struct DayReport {
    pub date: NaiveDate,
    pub cards: Vec<ResolvedPrayer>,
    pub snapshot: BoardSnapshot,
}

/// Load the requested day and evaluate the board at the requested time
///
/// Missing `--date` / `--time` fall back to `now`.
pub async fn evaluate_day(
    config: &BoardConfig,
    args: &ShowArgs,
    now: NaiveDateTime,
) -> Result<DayReport> {
    let date = args.date.unwrap_or_else(|| now.date());
    let at = match args.time {
        Some(time) => date.and_time(time.to_naive_time()),
        None => date.and_time(now.time()),
    };

    let provider = config.source.build();
    let schedule = load_daily(provider.as_ref(), date, config.isha_correction_minutes)
        .await
        .with_context(|| format!("Failed to load prayer times for {}", date))?;

    let resolver = config.resolver();
    let cards = resolver.resolve_all(&schedule, date);
    let snapshot = PrayerStateEngine::new(resolver)
        .with_in_progress_window(config.settings().in_progress_window)
        .evaluate(&schedule, at);

    Ok(DayReport {
        date,
        cards,
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleSource;
    use crate::types::{DisplayState, PrayerName, TimeOfDay};
    use tempfile::TempDir;

    const CSV: &str = "date,fajr,zuhr,asr,maghrib,isha\n\
        24-02-2026,06:10,12:50,15:40,18:20,19:41\n\
        25-02-2026,06:08,12:50,15:41,18:22,19:43\n";

    fn config(dir: &TempDir) -> BoardConfig {
        std::fs::write(dir.path().join("2026.csv"), CSV).unwrap();
        BoardConfig {
            source: ScheduleSource::File {
                path: dir.path().join("{year}.csv").to_string_lossy().into_owned(),
            },
            ..Default::default()
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 24)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_evaluate_day_defaults_to_now() {
        let dir = TempDir::new().unwrap();
        let report = evaluate_day(&config(&dir), &ShowArgs::default(), now())
            .await
            .unwrap();

        assert_eq!(report.date, now().date());
        // 19:41 + 4 = 19:45, seasonal weekday Iqamah 21:00
        assert_eq!(report.cards[4].adhan, TimeOfDay::from_hm(19, 45).unwrap());
        assert_eq!(report.cards[4].iqamah, TimeOfDay::from_hm(21, 0).unwrap());
        assert_eq!(
            report.snapshot.state,
            DisplayState::AwaitingIqamah {
                prayer: PrayerName::Isha,
                remaining: chrono::TimeDelta::hours(1),
            }
        );
    }

    #[tokio::test]
    async fn test_evaluate_day_with_explicit_date_and_time() {
        let dir = TempDir::new().unwrap();
        let args = ShowArgs {
            date: NaiveDate::from_ymd_opt(2026, 2, 25),
            time: TimeOfDay::from_hm(12, 0),
        };
        let report = evaluate_day(&config(&dir), &args, now()).await.unwrap();

        assert_eq!(report.date, NaiveDate::from_ymd_opt(2026, 2, 25).unwrap());
        assert_eq!(report.snapshot.current.unwrap().name, PrayerName::Fajr);
        assert_eq!(report.snapshot.highlighted, PrayerName::Zuhr);
    }

    #[tokio::test]
    async fn test_evaluate_day_missing_date_fails() {
        let dir = TempDir::new().unwrap();
        let args = ShowArgs {
            date: NaiveDate::from_ymd_opt(2026, 3, 1),
            time: None,
        };
        let err = evaluate_day(&config(&dir), &args, now()).await.unwrap_err();
        assert!(err.to_string().contains("2026-03-01"));
    }
}
