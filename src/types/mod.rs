//! 礼拝ボードのデータ型定義
//!
//! 礼拝名、1日分のアザーン時刻、イカーマ解決結果、表示状態を提供する。

pub mod time;

use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

pub use time::{add_minutes, TimeOfDay, TimeParseError, MINUTES_PER_DAY};

/// 1日5回の礼拝
///
/// 宣言順が時系列順。Ishaの次は翌日のFajr。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Zuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// 時系列順の全礼拝
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Zuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// 礼拝名を取得（CSVの列名と同じ小文字）
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Zuhr => "zuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    /// 表示用の大文字表記
    pub fn label(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "FAJR",
            PrayerName::Zuhr => "ZUHR",
            PrayerName::Asr => "ASR",
            PrayerName::Maghrib => "MAGHRIB",
            PrayerName::Isha => "ISHA",
        }
    }

    /// 時系列上のインデックス（0..5）
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 次の礼拝（Ishaの次はFajrに折り返す）
    pub fn next(&self) -> PrayerName {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// 前の礼拝（Fajrの前はIshaに折り返す）
    pub fn previous(&self) -> PrayerName {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PrayerName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "zuhr" | "dhuhr" => Ok(PrayerName::Zuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(()),
        }
    }
}

/// 礼拝ごとのイカーマ標準オフセット（分）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IqamahOffsets {
    pub fajr: i32,
    pub zuhr: i32,
    pub asr: i32,
    pub maghrib: i32,
    pub isha: i32,
}

impl Default for IqamahOffsets {
    fn default() -> Self {
        Self {
            fajr: 20,
            zuhr: 15,
            asr: 15,
            maghrib: 5,
            isha: 10,
        }
    }
}

impl IqamahOffsets {
    /// 礼拝のオフセットを取得
    pub fn get(&self, prayer: PrayerName) -> i32 {
        match prayer {
            PrayerName::Fajr => self.fajr,
            PrayerName::Zuhr => self.zuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    /// 設定を検証
    pub fn validate(&self) -> Result<(), String> {
        for prayer in PrayerName::ALL {
            let offset = self.get(prayer);
            if !(0..=120).contains(&offset) {
                return Err(format!(
                    "{} のイカーマオフセットは0-120分の範囲で指定してください",
                    prayer.as_str()
                ));
            }
        }
        Ok(())
    }
}

/// 1日分のアザーン時刻
///
/// 読み込み後は不変。Ishaの補正は `normalized` で一度だけ適用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    /// この時刻表が有効な日付
    pub date: NaiveDate,
    adhans: [TimeOfDay; 5],
}

impl DailySchedule {
    /// 時系列順（Fajr→Isha）のアザーン時刻から作成
    pub fn new(date: NaiveDate, adhans: [TimeOfDay; 5]) -> Self {
        Self { date, adhans }
    }

    /// 礼拝のアザーン時刻
    pub fn adhan(&self, prayer: PrayerName) -> TimeOfDay {
        self.adhans[prayer.index()]
    }

    /// 時系列順に (礼拝, アザーン) を列挙
    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, TimeOfDay)> + '_ {
        PrayerName::ALL.iter().map(move |&p| (p, self.adhan(p)))
    }

    /// 読み込み時の正規化（Ishaのアザーンに補正分を加える）
    ///
    /// 時刻表の読み込みごとに一度だけ呼ぶこと。
    pub fn normalized(mut self, isha_correction_minutes: i32) -> Self {
        let isha = PrayerName::Isha.index();
        self.adhans[isha] = self.adhans[isha].add_minutes(isha_correction_minutes);
        self
    }
}

/// イカーマまで解決済みの礼拝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPrayer {
    pub name: PrayerName,
    pub adhan: TimeOfDay,
    pub iqamah: TimeOfDay,
}

/// ボードに表示するカウントダウン状態
///
/// ティックごとに再計算され、保存されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// 現在の礼拝のイカーマ待ち
    AwaitingIqamah {
        prayer: PrayerName,
        remaining: TimeDelta,
    },
    /// 礼拝中
    InProgress { prayer: PrayerName },
    /// 次のアザーン待ち
    AwaitingNextAdhan {
        prayer: PrayerName,
        remaining: TimeDelta,
    },
}

impl DisplayState {
    /// 状態が対象とする礼拝
    pub fn prayer(&self) -> PrayerName {
        match self {
            DisplayState::AwaitingIqamah { prayer, .. }
            | DisplayState::InProgress { prayer }
            | DisplayState::AwaitingNextAdhan { prayer, .. } => *prayer,
        }
    }

    /// 残り時間（礼拝中は `None`）
    pub fn remaining(&self) -> Option<TimeDelta> {
        match self {
            DisplayState::AwaitingIqamah { remaining, .. }
            | DisplayState::AwaitingNextAdhan { remaining, .. } => Some(*remaining),
            DisplayState::InProgress { .. } => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
