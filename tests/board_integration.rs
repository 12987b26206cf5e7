//! ボード統合テスト
//!
//! CSVファイル → 時刻表プロバイダー → ボードエンジン → 表示 の連携をテストする。

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use salat::board::{BoardEngine, BoardEvent, BoardSettings, Clock};
use salat::display::format::{LOAD_ERROR_TEXT, RECONNECTING_TEXT};
use salat::display::{DisplaySink, TextSlot};
use salat::iqamah::IqamahResolver;
use salat::schedule::FileScheduleProvider;
use salat::types::{PrayerName, ResolvedPrayer};
use tempfile::TempDir;
use tokio::sync::mpsc;

const CSV_2026: &str = "\
date,fajr,zuhr,asr,maghrib,isha
28-02-2026,06:00,12:50,15:48,18:31,19:52
01-03-2026,05:58,12:50,15:49,18:33,19:54
";

#[derive(Default)]
struct RecordingSink {
    texts: HashMap<TextSlot, String>,
    highlighted: HashSet<PrayerName>,
    cards: Vec<ResolvedPrayer>,
}

impl RecordingSink {
    fn text(&self, slot: TextSlot) -> &str {
        self.texts.get(&slot).map(String::as_str).unwrap_or("")
    }
}

impl DisplaySink for RecordingSink {
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
        self.cards = prayers.to_vec();
    }
}

struct Harness {
    _dir: TempDir,
    csv_path: std::path::PathBuf,
    clock: Arc<Mutex<NaiveDateTime>>,
    engine: BoardEngine<Box<dyn Fn() -> NaiveDateTime>, RecordingSink>,
    events: mpsc::UnboundedReceiver<BoardEvent>,
}

impl Harness {
    fn new(now: NaiveDateTime, write_csv: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("2026-prayer-time.csv");
        if write_csv {
            std::fs::write(&csv_path, CSV_2026).unwrap();
        }
        let template = dir.path().join("{year}-prayer-time.csv");

        let clock = Arc::new(Mutex::new(now));
        let clock_ref = Arc::clone(&clock);
        let clock_fn: Box<dyn Fn() -> NaiveDateTime> =
            Box::new(move || *clock_ref.lock().unwrap());

        let (event_tx, events) = mpsc::unbounded_channel();
        let settings = BoardSettings {
            retry_delay: Duration::from_millis(50),
            ..Default::default()
        };
        let engine = BoardEngine::new(
            clock_fn,
            RecordingSink::default(),
            Arc::new(FileScheduleProvider::new(template.to_string_lossy())),
            IqamahResolver::default(),
            settings,
            event_tx,
        );

        Self {
            _dir: dir,
            csv_path,
            clock,
            engine,
            events,
        }
    }

    fn set_time(&self, now: NaiveDateTime) {
        *self.clock.lock().unwrap() = now;
    }

    /// 条件を満たすまでティックを繰り返す
    async fn tick_until(&mut self, mut done: impl FnMut(&BoardEngine<Box<dyn Fn() -> NaiveDateTime>, RecordingSink>) -> bool) {
        for _ in 0..200 {
            self.engine.tick();
            if done(&self.engine) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    fn drain_events(&mut self) -> Vec<BoardEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn test_boxed_closure_is_a_clock() {
    let fixed = at(2026, 2, 28, 12, 0, 0);
    let clock: Box<dyn Fn() -> NaiveDateTime> = Box::new(move || fixed);
    assert_eq!(clock.now(), fixed);
}

#[tokio::test]
async fn test_csv_file_to_board() {
    // 2026-02-28 (土) は季節オーバーライド期間内
    let mut harness = Harness::new(at(2026, 2, 28, 20, 0, 0), true);
    harness.engine.start();
    harness.tick_until(|e| e.schedule().is_some()).await;

    let sink = harness.engine.sink();
    assert_eq!(sink.text(TextSlot::Clock), "20:00:00");
    assert_eq!(sink.text(TextSlot::Date), "Samedi 28 Février 2026");
    assert_eq!(sink.cards.len(), 5);

    let isha = sink.cards[4];
    assert_eq!(isha.adhan.to_string(), "19:56");
    assert_eq!(isha.iqamah.to_string(), "20:45");
    assert_eq!(sink.text(TextSlot::Timer), "Iqamah ISHA: 45:00");
    assert_eq!(sink.highlighted, HashSet::from([PrayerName::Isha]));

    // Zuhr 12:50 + 15 → 13:05 < 13:15 → 12:30
    assert_eq!(sink.cards[1].iqamah.to_string(), "12:30");
}

#[tokio::test]
async fn test_day_rollover_loads_next_day() {
    let mut harness = Harness::new(at(2026, 2, 28, 23, 59, 58), true);
    harness.engine.start();
    harness.tick_until(|e| e.schedule().is_some()).await;

    harness.set_time(at(2026, 3, 1, 0, 0, 1));
    harness
        .tick_until(|e| e.schedule().map(|s| s.date) == NaiveDate::from_ymd_opt(2026, 3, 1))
        .await;

    let sink = harness.engine.sink();
    assert_eq!(sink.text(TextSlot::Date), "Dimanche 01 Mars 2026");
    assert_eq!(sink.cards[0].adhan.to_string(), "05:58");
    assert_eq!(sink.text(TextSlot::Timer), "Prochaine: FAJR dans 5:57:59");

    let events = harness.drain_events();
    assert!(events.contains(&BoardEvent::DayRolledOver {
        date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }));
}

#[tokio::test]
async fn test_missing_file_then_recovery() {
    let mut harness = Harness::new(at(2026, 2, 28, 12, 0, 0), false);
    harness.engine.start();
    harness
        .tick_until(|e| e.sink().text(TextSlot::ErrorMessage) == LOAD_ERROR_TEXT)
        .await;

    assert_eq!(harness.engine.sink().text(TextSlot::Timer), RECONNECTING_TEXT);
    assert!(harness.engine.retry_pending());

    std::fs::write(&harness.csv_path, CSV_2026).unwrap();
    harness.tick_until(|e| e.schedule().is_some()).await;

    let sink = harness.engine.sink();
    assert_eq!(sink.text(TextSlot::ErrorMessage), "");
    assert_eq!(sink.text(TextSlot::Timer), "Prochaine: ZUHR dans 0:50:00");

    let events = harness.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        BoardEvent::LoadFailed {
            kind: "transport",
            ..
        }
    )));
    assert!(events.iter().any(|e| matches!(e, BoardEvent::RetryScheduled { .. })));
}

#[tokio::test]
async fn test_date_missing_from_csv_keeps_retrying() {
    let mut harness = Harness::new(at(2026, 6, 1, 12, 0, 0), true);
    harness.engine.start();
    harness
        .tick_until(|e| e.sink().text(TextSlot::ErrorMessage) == LOAD_ERROR_TEXT)
        .await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    harness.engine.tick();
    assert!(harness.engine.schedule().is_none());

    let failures = harness
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, BoardEvent::LoadFailed { kind: "missing_date", .. }))
        .count();
    assert!(failures >= 2, "expected repeated retries, got {}", failures);
}
