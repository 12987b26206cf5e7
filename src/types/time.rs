//! 時刻ユーティリティ
//!
//! "HH:MM" 形式の時刻と、0時からの経過分（0..1440）を相互に変換する。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// 1日の分数
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// 時刻パースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// "HH:MM" の形になっていない
    #[error("invalid time format (expected HH:MM): {0:?}")]
    Format(String),
    /// 時・分が範囲外
    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

/// 1日の中の時刻（分単位）
///
/// 内部表現は0時からの経過分で、常に `0..1440` に収まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// 時・分から作成
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// 0時からの経過分から作成（1日を超える値は折り返す）
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: minutes.rem_euclid(MINUTES_PER_DAY as i64) as u16,
        }
    }

    /// 空文字列を「時刻なし」として扱うパース
    pub fn parse_optional(s: &str) -> Result<Option<Self>, TimeParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }

    /// 0時からの経過分
    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn hour(&self) -> u32 {
        self.minutes_since_midnight() / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes_since_midnight() % 60
    }

    /// 分を加算する
    ///
    /// 23:59 を超えた場合は翌日の早朝に折り返すが、日付の繰り上がりは返さない。
    /// 日付をまたぐ判定は呼び出し側で行うこと。
    pub fn add_minutes(&self, delta: i32) -> Self {
        Self::from_minutes(i64::from(self.minutes) + i64::from(delta))
    }

    /// chrono の時刻型から時・分を取り出して作成（秒は切り捨て）
    pub fn from_timelike<T: chrono::Timelike>(value: &T) -> Self {
        Self {
            minutes: (value.hour() * 60 + value.minute()) as u16,
        }
    }

    /// chrono の `NaiveTime` に変換（秒は0）
    pub fn to_naive_time(&self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or_default()
    }
}

/// `Option` のまま分を加算する（時刻なしはそのまま伝播）
pub fn add_minutes(time: Option<TimeOfDay>, delta: i32) -> Option<TimeOfDay> {
    time.map(|t| t.add_minutes(delta))
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(s.to_string()))?;

        let is_digits = |part: &str| {
            !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_digits(h) || !is_digits(m) {
            return Err(TimeParseError::Format(s.to_string()));
        }

        // 2桁以下の数字のみなのでパースは失敗しない
        let hour: u32 = h.parse().map_err(|_| TimeParseError::Format(s.to_string()))?;
        let minute: u32 = m.parse().map_err(|_| TimeParseError::Format(s.to_string()))?;

        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
