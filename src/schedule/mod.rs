//! 時刻表プロバイダー
//!
//! 年を指定して `DD-MM-YYYY` → 5回分のアザーン時刻の対応表を取得する。
//! 取得元はHTTP（年ごとのCSV）またはローカルファイル。

pub mod csv;
pub mod error;
pub mod file;
pub mod http;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{DailySchedule, TimeOfDay};

pub use self::csv::parse_year_csv;
pub use error::{Result, ScheduleError};
pub use file::FileScheduleProvider;
pub use http::HttpScheduleProvider;

/// 時刻表のキーの日付形式
pub const DATE_KEY_FORMAT: &str = "%d-%m-%Y";

/// 日付を時刻表のキー（`DD-MM-YYYY`）に変換
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// 1日分の生のレコード（各値は "HH:MM"）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub fajr: String,
    pub zuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl ScheduleRecord {
    /// 時刻を検証して `DailySchedule` に変換
    pub fn to_daily(&self, date: NaiveDate) -> Result<DailySchedule> {
        let parse = |column: &str, value: &str| -> Result<TimeOfDay> {
            TimeOfDay::parse_optional(value)
                .map_err(|e| ScheduleError::Parse(format!("{} {}: {}", date_key(date), column, e)))?
                .ok_or_else(|| {
                    ScheduleError::Parse(format!("{} {}: empty time", date_key(date), column))
                })
        };

        Ok(DailySchedule::new(
            date,
            [
                parse("fajr", &self.fajr)?,
                parse("zuhr", &self.zuhr)?,
                parse("asr", &self.asr)?,
                parse("maghrib", &self.maghrib)?,
                parse("isha", &self.isha)?,
            ],
        ))
    }
}

/// 1年分の時刻表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearSchedule {
    entries: HashMap<String, ScheduleRecord>,
}

impl YearSchedule {
    pub fn new(entries: HashMap<String, ScheduleRecord>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 日付のレコードを取得
    pub fn get(&self, date: NaiveDate) -> Option<&ScheduleRecord> {
        self.entries.get(&date_key(date))
    }

    /// 日付のレコードを追加（既存は上書き）
    pub fn insert(&mut self, date: NaiveDate, record: ScheduleRecord) {
        self.entries.insert(date_key(date), record);
    }

    /// 当日分を検証済みの形で取り出す
    pub fn daily(&self, date: NaiveDate) -> Result<DailySchedule> {
        self.get(date)
            .ok_or_else(|| ScheduleError::MissingDate(date_key(date)))?
            .to_daily(date)
    }
}

/// 時刻表の取得元
///
/// 見つからない場合や内容が不正な場合は、空の結果ではなく明示的なエラーを返すこと。
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// 1年分の時刻表を取得
    async fn fetch_year(&self, year: i32) -> Result<YearSchedule>;

    /// ログ用の名前
    fn name(&self) -> &str {
        "ScheduleProvider"
    }
}

/// 指定日の時刻表を読み込み、正規化（Isha補正）まで行う
pub async fn load_daily(
    provider: &dyn ScheduleProvider,
    date: NaiveDate,
    isha_correction_minutes: i32,
) -> Result<DailySchedule> {
    let year = provider.fetch_year(date.year()).await?;
    Ok(year.daily(date)?.normalized(isha_correction_minutes))
}

/// 設定ファイルで指定する取得元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleSource {
    /// `{year}` を年に置き換えたURLからCSVを取得
    Http { url: String },
    /// `{year}` を年に置き換えたパスのCSVを読み込む
    File { path: String },
}

/// 既定の時刻表URL
pub const DEFAULT_SCHEDULE_URL: &str = "https://raw.githubusercontent.com/himo-tech/cmam-prayer-time/refs/heads/main/prayer-time/{year}-prayer-time.csv";

impl Default for ScheduleSource {
    fn default() -> Self {
        ScheduleSource::Http {
            url: DEFAULT_SCHEDULE_URL.to_string(),
        }
    }
}

impl ScheduleSource {
    /// プロバイダーを作成
    pub fn build(&self) -> Arc<dyn ScheduleProvider> {
        match self {
            ScheduleSource::Http { url } => Arc::new(HttpScheduleProvider::new(url.clone())),
            ScheduleSource::File { path } => Arc::new(FileScheduleProvider::new(path.clone())),
        }
    }

    /// 設定を検証
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            ScheduleSource::Http { url } => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(format!("URLはhttp(s)で指定してください: {}", url));
                }
            }
            ScheduleSource::File { path } => {
                if path.trim().is_empty() {
                    return Err("ファイルパスが空です".to_string());
                }
            }
        }
        Ok(())
    }
}

/// テンプレート中の `{year}` を置換
pub(crate) fn expand_year(template: &str, year: i32) -> String {
    template.replace("{year}", &year.to_string())
}

// ============================================================================
// Tests
// ============================================================================
