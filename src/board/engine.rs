//! ボードエンジン
//!
//! 1秒ごとのティックで時計・日付・カウントダウンを表示へ書き込む。
//! 時刻表の読み込みは別タスクで行い、結果はチャネル経由で次のティックに受け取る。
//! 読み込みは要求日付でタグ付けされ、現在の日付と異なる結果は破棄される。

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::state::{PrayerStateEngine, DEFAULT_IN_PROGRESS_MINUTES};
use crate::display::format::{LOAD_ERROR_TEXT, RECONNECTING_TEXT};
use crate::display::{format_clock, format_date_fr, format_timer, DisplaySink, TextSlot};
use crate::iqamah::IqamahResolver;
use crate::schedule::{load_daily, ScheduleError, ScheduleProvider};
use crate::types::{DailySchedule, PrayerName};

/// 既定の再試行間隔（秒）
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 60;

/// 既定のIsha補正（分）
pub const DEFAULT_ISHA_CORRECTION_MINUTES: i32 = 4;

/// 現在時刻の取得元
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// ローカル時刻を返す時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// ボードイベント
///
/// ログ出力やテストでの観測に使用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// 時刻表を読み込んだ
    ScheduleLoaded { date: NaiveDate },
    /// 読み込みに失敗した
    LoadFailed { date: NaiveDate, kind: &'static str },
    /// 古い日付の読み込み結果を破棄した
    StaleLoadDiscarded { date: NaiveDate },
    /// 再試行を予約した
    RetryScheduled { date: NaiveDate },
    /// 日付が変わった
    DayRolledOver { date: NaiveDate },
}

/// 読み込みのきっかけ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Initial,
    Rollover,
    Retry,
}

/// 読み込み結果（要求日付でタグ付け）
#[derive(Debug)]
pub struct LoadOutcome {
    pub requested_for: NaiveDate,
    pub origin: LoadOrigin,
    pub result: Result<DailySchedule, ScheduleError>,
}

/// エンジンの動作設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSettings {
    /// 読み込み時にIshaのアザーンへ加える分
    pub isha_correction_minutes: i32,
    /// 失敗時の再試行までの時間
    pub retry_delay: Duration,
    /// イカーマ後に礼拝中とみなす時間
    pub in_progress_window: TimeDelta,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            isha_correction_minutes: DEFAULT_ISHA_CORRECTION_MINUTES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            in_progress_window: TimeDelta::minutes(DEFAULT_IN_PROGRESS_MINUTES),
        }
    }
}

/// ボードエンジン
///
/// # 使用方法
///
/// ```ignore
/// let (event_tx, mut event_rx) = mpsc::unbounded_channel();
/// let mut engine = BoardEngine::new(SystemClock, sink, provider, resolver, settings, event_tx);
/// engine.start();
/// let mut ticker = BoardEngine::<SystemClock, TerminalBoard>::create_ticker();
///
/// loop {
///     ticker.tick().await;
///     engine.tick();
/// }
/// ```
pub struct BoardEngine<C: Clock, S: DisplaySink> {
    clock: C,
    sink: S,
    provider: Arc<dyn ScheduleProvider>,
    state_engine: PrayerStateEngine,
    settings: BoardSettings,
    /// 表示中の日付
    current_date: NaiveDate,
    /// 読み込み済みの時刻表（`current_date` のもの）
    schedule: Option<DailySchedule>,
    /// 実行中の即時読み込み
    pending_load: Option<NaiveDate>,
    /// 予約中の再試行（1つまで）
    retry: Option<(NaiveDate, JoinHandle<()>)>,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    event_tx: mpsc::UnboundedSender<BoardEvent>,
}

impl<C: Clock, S: DisplaySink> BoardEngine<C, S> {
    /// 新しいBoardEngineを作成
    pub fn new(
        clock: C,
        sink: S,
        provider: Arc<dyn ScheduleProvider>,
        resolver: IqamahResolver,
        settings: BoardSettings,
        event_tx: mpsc::UnboundedSender<BoardEvent>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let current_date = clock.now().date();
        let state_engine =
            PrayerStateEngine::new(resolver).with_in_progress_window(settings.in_progress_window);

        Self {
            clock,
            sink,
            provider,
            state_engine,
            settings,
            current_date,
            schedule: None,
            pending_load: None,
            retry: None,
            outcome_tx,
            outcome_rx,
            event_tx,
        }
    }

    /// ティック用のIntervalを作成
    ///
    /// `MissedTickBehavior::Skip` を設定済み。
    pub fn create_ticker() -> Interval {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// 当日分の初回読み込みを開始
    pub fn start(&mut self) {
        self.current_date = self.clock.now().date();
        info!("時刻表を読み込みます: {} ({})", self.current_date, self.provider.name());
        self.spawn_load(self.current_date, LoadOrigin::Initial);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn schedule(&self) -> Option<&DailySchedule> {
        self.schedule.as_ref()
    }

    /// 再試行が予約されているか
    pub fn retry_pending(&self) -> bool {
        self.retry.is_some()
    }

    /// 1ティックを処理
    ///
    /// 読み込み結果の反映 → 時計 → 日付の切り替え → 状態評価 → 表示 の順。
    pub fn tick(&mut self) {
        self.drain_outcomes();

        let now = self.clock.now();
        self.sink.set_text(TextSlot::Clock, &format_clock(now));

        let today = now.date();
        if today != self.current_date {
            self.roll_over(today);
        }
        self.sink.set_text(TextSlot::Date, &format_date_fr(today));

        let Some(schedule) = self.schedule.as_ref() else {
            self.sink.set_text(TextSlot::Timer, RECONNECTING_TEXT);
            self.schedule_retry();
            self.sink.flush();
            return;
        };

        let snapshot = self.state_engine.evaluate(schedule, now);
        for prayer in PrayerName::ALL {
            self.sink.set_highlight(prayer, prayer == snapshot.highlighted);
        }
        self.sink.set_text(TextSlot::Timer, &format_timer(&snapshot.state));
        self.sink.flush();
    }

    /// 届いている読み込み結果をすべて反映
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let date = outcome.requested_for;

        match outcome.origin {
            LoadOrigin::Retry => {
                if matches!(self.retry.as_ref(), Some((retry_date, _)) if *retry_date == date) {
                    self.retry = None;
                }
            }
            LoadOrigin::Initial | LoadOrigin::Rollover => {
                if self.pending_load == Some(date) {
                    self.pending_load = None;
                }
            }
        }

        if date != self.current_date {
            debug!("古い読み込み結果を破棄します: {}", date);
            self.emit(BoardEvent::StaleLoadDiscarded { date });
            return;
        }

        match outcome.result {
            Ok(schedule) => {
                info!("時刻表を読み込みました: {}", date);
                let cards = self.state_engine.resolver().resolve_all(&schedule, date);
                self.sink.render_cards(&cards);
                self.sink.set_text(TextSlot::Date, &format_date_fr(date));
                self.sink.set_text(TextSlot::ErrorMessage, "");
                self.schedule = Some(schedule);
                self.emit(BoardEvent::ScheduleLoaded { date });
            }
            Err(e) => {
                warn!("時刻表の読み込みに失敗しました ({}): {}", date, e);
                self.sink.set_text(TextSlot::ErrorMessage, LOAD_ERROR_TEXT);
                self.emit(BoardEvent::LoadFailed {
                    date,
                    kind: e.kind(),
                })
            }
        }
    }

    /// 日付の切り替え
    ///
    /// 前日の時刻表は破棄し、無条件に読み込み直す。
    fn roll_over(&mut self, today: NaiveDate) {
        info!("日付が変わりました: {} → {}", self.current_date, today);
        self.current_date = today;
        self.schedule = None;

        if let Some((_, handle)) = self.retry.take() {
            handle.abort();
        }

        self.spawn_load(today, LoadOrigin::Rollover);
        self.emit(BoardEvent::DayRolledOver { date: today });
    }

    /// 時刻表がない場合の再試行（同時に1つまで）
    fn schedule_retry(&mut self) {
        let date = self.current_date;
        if self.retry.is_some() || self.pending_load == Some(date) {
            return;
        }

        debug!(
            "{}秒後に再試行します: {}",
            self.settings.retry_delay.as_secs(),
            date
        );

        let delay = self.settings.retry_delay;
        let provider = Arc::clone(&self.provider);
        let correction = self.settings.isha_correction_minutes;
        let tx = self.outcome_tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = load_daily(provider.as_ref(), date, correction).await;
            let _ = tx.send(LoadOutcome {
                requested_for: date,
                origin: LoadOrigin::Retry,
                result,
            });
        });

        self.retry = Some((date, handle));
        self.emit(BoardEvent::RetryScheduled { date });
    }

    fn spawn_load(&mut self, date: NaiveDate, origin: LoadOrigin) {
        self.pending_load = Some(date);

        let provider = Arc::clone(&self.provider);
        let correction = self.settings.isha_correction_minutes;
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = load_daily(provider.as_ref(), date, correction).await;
            let _ = tx.send(LoadOutcome {
                requested_for: date,
                origin,
                result,
            });
        });
    }

    /// イベントを送信（受信側がなければ捨てる）
    fn emit(&self, event: BoardEvent) {
        if let Err(e) = self.event_tx.send(event) {
            debug!("ボードイベントの受信側がありません: {:?}", e.0);
        }
    }
}

/// ボードを停止シグナルまで動かす
pub async fn run<C, S, F>(mut engine: BoardEngine<C, S>, shutdown: F) -> Result<()>
where
    C: Clock,
    S: DisplaySink,
    F: std::future::Future<Output = ()>,
{
    engine.start();
    let mut ticker = BoardEngine::<C, S>::create_ticker();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.tick();
            }
            _ = &mut shutdown => {
                info!("ボードを停止します");
                break;
            }
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
