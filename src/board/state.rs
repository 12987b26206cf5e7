//! 礼拝状態エンジン
//!
//! その日のアザーン時刻と現在時刻から、現在の礼拝・次の礼拝・
//! 強調表示する礼拝・カウントダウン状態を求める。
//! 内部状態を持たないため、ティックごとに呼び出してよい。

use chrono::{NaiveDateTime, TimeDelta};

use crate::iqamah::IqamahResolver;
use crate::types::{DailySchedule, DisplayState, PrayerName, ResolvedPrayer, TimeOfDay};

/// イカーマ後に「礼拝中」とみなす既定の時間（分）
pub const DEFAULT_IN_PROGRESS_MINUTES: i64 = 30;

/// 1ティック分の評価結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// 直前にアザーンを迎えた礼拝（Fajr前は `None`）
    pub current: Option<ResolvedPrayer>,
    /// 次にアザーンを迎える礼拝
    pub next: PrayerName,
    /// 次の礼拝のアザーン時刻
    pub next_adhan: TimeOfDay,
    /// 次の礼拝が翌日のFajrかどうか
    pub next_is_tomorrow: bool,
    /// 強調表示する礼拝
    pub highlighted: PrayerName,
    /// カウントダウン状態
    pub state: DisplayState,
}

/// 礼拝状態エンジン
#[derive(Debug, Clone)]
pub struct PrayerStateEngine {
    resolver: IqamahResolver,
    in_progress_window: TimeDelta,
}

impl Default for PrayerStateEngine {
    fn default() -> Self {
        Self::new(IqamahResolver::default())
    }
}

impl PrayerStateEngine {
    /// 既定の礼拝中時間（30分）で作成
    pub fn new(resolver: IqamahResolver) -> Self {
        Self {
            resolver,
            in_progress_window: TimeDelta::minutes(DEFAULT_IN_PROGRESS_MINUTES),
        }
    }

    /// 礼拝中時間を変更
    pub fn with_in_progress_window(mut self, window: TimeDelta) -> Self {
        self.in_progress_window = window;
        self
    }

    pub fn resolver(&self) -> &IqamahResolver {
        &self.resolver
    }

    /// 現在時刻に対する状態を評価
    pub fn evaluate(&self, schedule: &DailySchedule, now: NaiveDateTime) -> BoardSnapshot {
        let today = now.date();
        let now_minutes = TimeOfDay::from_timelike(&now.time()).minutes_since_midnight();

        let next_index = schedule
            .iter()
            .position(|(_, adhan)| adhan.minutes_since_midnight() > now_minutes);

        let (current, next, next_is_tomorrow) = match next_index {
            Some(0) => (None, PrayerName::Fajr, false),
            Some(i) => (Some(PrayerName::ALL[i - 1]), PrayerName::ALL[i], false),
            // Ishaのアザーン以降は翌日のFajrが次
            None => (Some(PrayerName::Isha), PrayerName::Fajr, true),
        };

        let next_adhan = schedule.adhan(next);
        let current = current.map(|prayer| self.resolver.resolve_prayer(schedule, prayer, today));

        let Some(current) = current else {
            // Fajr前
            let fajr_moment = today.and_time(next_adhan.to_naive_time());
            return BoardSnapshot {
                current: None,
                next,
                next_adhan,
                next_is_tomorrow,
                highlighted: next,
                state: DisplayState::AwaitingNextAdhan {
                    prayer: next,
                    remaining: fajr_moment - now,
                },
            };
        };

        let iqamah_moment = today.and_time(current.iqamah.to_naive_time());
        let before_iqamah = now_minutes < current.iqamah.minutes_since_midnight();
        let within_window = now - iqamah_moment <= self.in_progress_window;

        let highlighted = if before_iqamah || within_window {
            current.name
        } else {
            next
        };

        let first_adhan = schedule.adhan(PrayerName::Fajr).minutes_since_midnight();
        let state = if before_iqamah {
            DisplayState::AwaitingIqamah {
                prayer: current.name,
                remaining: iqamah_moment - now,
            }
        } else if within_window || (current.name == PrayerName::Isha && now_minutes >= first_adhan) {
            DisplayState::InProgress {
                prayer: current.name,
            }
        } else {
            let mut next_moment = today.and_time(next_adhan.to_naive_time());
            if next_moment <= now {
                next_moment += TimeDelta::days(1);
            }
            DisplayState::AwaitingNextAdhan {
                prayer: next,
                remaining: next_moment - now,
            }
        };

        BoardSnapshot {
            current: Some(current),
            next,
            next_adhan,
            next_is_tomorrow,
            highlighted,
            state,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
