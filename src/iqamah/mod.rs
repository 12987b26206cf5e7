//! イカーマ解決
//!
//! アザーン時刻と礼拝ごとの標準オフセットからイカーマ時刻を求める。
//! Zuhrは下限補正、Ishaは季節オーバーライドと時間帯ごとの補正を持つ。
//! すべて副作用のない純粋関数。

pub mod season;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DailySchedule, IqamahOffsets, PrayerName, ResolvedPrayer, TimeOfDay};

pub use season::{MonthDay, SeasonalWindow};

/// Zuhrの補正ルール
///
/// 候補が `threshold` より早い場合は `floor` を使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZuhrRule {
    pub floor: TimeOfDay,
    pub threshold: TimeOfDay,
}

impl Default for ZuhrRule {
    fn default() -> Self {
        Self {
            floor: TimeOfDay::from_minutes(12 * 60 + 30),
            threshold: TimeOfDay::from_minutes(13 * 60 + 15),
        }
    }
}

/// Ishaの補正ルール（季節オーバーライド期間外）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IshaRule {
    /// アザーンが早い日のイカーマ下限
    pub earliest: TimeOfDay,
    /// イカーマの上限。アザーンがこれ以降ならイカーマはアザーンと同時刻
    pub latest: TimeOfDay,
    /// 季節オーバーライド期間（`null` で無効）
    pub seasonal: Option<SeasonalWindow>,
}

impl Default for IshaRule {
    fn default() -> Self {
        Self {
            earliest: TimeOfDay::from_minutes(19 * 60 + 30),
            latest: TimeOfDay::from_minutes(21 * 60 + 30),
            seasonal: Some(SeasonalWindow::default()),
        }
    }
}

/// 礼拝ごとの特別ルール
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IqamahRules {
    pub zuhr: ZuhrRule,
    pub isha: IshaRule,
}

impl IqamahRules {
    /// 設定を検証
    pub fn validate(&self) -> Result<(), String> {
        if self.isha.earliest > self.isha.latest {
            return Err("Ishaのイカーマ下限は上限より前にしてください".to_string());
        }
        if let Some(window) = &self.isha.seasonal {
            window.validate()?;
        }
        Ok(())
    }

    /// イカーマ時刻を解決
    ///
    /// `today` はIshaの季節オーバーライド判定にのみ使う。
    pub fn resolve(
        &self,
        prayer: PrayerName,
        adhan: TimeOfDay,
        offset_minutes: i32,
        today: NaiveDate,
    ) -> TimeOfDay {
        let candidate = adhan.add_minutes(offset_minutes);
        match prayer {
            PrayerName::Zuhr => self.resolve_zuhr(candidate),
            PrayerName::Isha => self.resolve_isha(adhan, candidate, today),
            _ => candidate,
        }
    }

    fn resolve_zuhr(&self, candidate: TimeOfDay) -> TimeOfDay {
        if candidate.minutes_since_midnight() < self.zuhr.threshold.minutes_since_midnight() {
            self.zuhr.floor
        } else {
            candidate
        }
    }

    fn resolve_isha(&self, adhan: TimeOfDay, candidate: TimeOfDay, today: NaiveDate) -> TimeOfDay {
        if let Some(window) = &self.isha.seasonal {
            if window.contains(today) {
                return window.iqamah_for(today);
            }
        }

        let adhan_min = adhan.minutes_since_midnight();
        let candidate_min = candidate.minutes_since_midnight();
        let earliest = self.isha.earliest.minutes_since_midnight();
        let latest = self.isha.latest.minutes_since_midnight();

        if adhan_min < earliest && candidate_min <= earliest {
            self.isha.earliest
        } else if adhan_min < latest && candidate_min > latest {
            self.isha.latest
        } else if adhan_min >= latest {
            adhan
        } else {
            candidate
        }
    }
}

/// イカーマ解決器
///
/// 標準オフセット表と特別ルールをまとめて保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IqamahResolver {
    offsets: IqamahOffsets,
    rules: IqamahRules,
}

impl IqamahResolver {
    pub fn new(offsets: IqamahOffsets, rules: IqamahRules) -> Self {
        Self { offsets, rules }
    }

    pub fn offsets(&self) -> &IqamahOffsets {
        &self.offsets
    }

    pub fn rules(&self) -> &IqamahRules {
        &self.rules
    }

    /// 1つの礼拝のイカーマを解決
    pub fn resolve(&self, prayer: PrayerName, adhan: TimeOfDay, today: NaiveDate) -> TimeOfDay {
        self.rules
            .resolve(prayer, adhan, self.offsets.get(prayer), today)
    }

    /// 礼拝を解決済みの形で取得
    pub fn resolve_prayer(&self, schedule: &DailySchedule, prayer: PrayerName, today: NaiveDate) -> ResolvedPrayer {
        let adhan = schedule.adhan(prayer);
        ResolvedPrayer {
            name: prayer,
            adhan,
            iqamah: self.resolve(prayer, adhan, today),
        }
    }

    /// 1日分を時系列順にすべて解決
    pub fn resolve_all(&self, schedule: &DailySchedule, today: NaiveDate) -> Vec<ResolvedPrayer> {
        PrayerName::ALL
            .iter()
            .map(|&prayer| self.resolve_prayer(schedule, prayer, today))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
