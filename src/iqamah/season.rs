//! Ishaの季節オーバーライド期間

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::TimeOfDay;

/// 月日（年を持たない日付）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.month(), date.day())
    }

    fn is_valid(&self) -> bool {
        // 閏年を許容するため2024年で検証する
        NaiveDate::from_ymd_opt(2024, self.month, self.day).is_some()
    }
}

/// 毎年繰り返す期間（両端を含む）
///
/// `year` を指定した場合はその年だけ有効になる。
/// `start > end` の場合は年末をまたぐ期間として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalWindow {
    pub start: MonthDay,
    pub end: MonthDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// 土日のイカーマ
    pub weekend_iqamah: TimeOfDay,
    /// 平日のイカーマ
    pub weekday_iqamah: TimeOfDay,
}

impl Default for SeasonalWindow {
    fn default() -> Self {
        Self {
            start: MonthDay::new(2, 17),
            end: MonthDay::new(3, 20),
            year: None,
            weekend_iqamah: TimeOfDay::from_minutes(20 * 60 + 45),
            weekday_iqamah: TimeOfDay::from_minutes(21 * 60),
        }
    }
}

impl SeasonalWindow {
    /// 日付が期間内か判定
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(year) = self.year {
            if date.year() != year {
                return false;
            }
        }

        let today = MonthDay::of(date);
        if self.start <= self.end {
            self.start <= today && today <= self.end
        } else {
            today >= self.start || today <= self.end
        }
    }

    /// 曜日に応じた固定イカーマ
    pub fn iqamah_for(&self, date: NaiveDate) -> TimeOfDay {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => self.weekend_iqamah,
            _ => self.weekday_iqamah,
        }
    }

    /// 設定を検証
    pub fn validate(&self) -> Result<(), String> {
        if !self.start.is_valid() {
            return Err(format!("季節期間の開始日が不正です: {:?}", self.start));
        }
        if !self.end.is_valid() {
            return Err(format!("季節期間の終了日が不正です: {:?}", self.end));
        }
        Ok(())
    }
}
