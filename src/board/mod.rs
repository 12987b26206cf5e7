//! 礼拝時刻ボード
//!
//! 状態評価（`state`）と、ティック・読み込み・日付切り替えを担うエンジン（`engine`）。

pub mod engine;
pub mod state;

pub use engine::{
    run, BoardEngine, BoardEvent, BoardSettings, Clock, LoadOrigin, LoadOutcome, SystemClock,
    DEFAULT_ISHA_CORRECTION_MINUTES, DEFAULT_RETRY_DELAY_SECS,
};
pub use state::{BoardSnapshot, PrayerStateEngine, DEFAULT_IN_PROGRESS_MINUTES};
