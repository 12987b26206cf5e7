//! ボード設定
//!
//! `~/.salat/config.json` から読み込む。ファイルがなければ既定値を使う。
//! 省略した項目はすべて既定値で補われる。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Duration;
use tracing::debug;

use crate::board::{
    BoardSettings, DEFAULT_IN_PROGRESS_MINUTES, DEFAULT_ISHA_CORRECTION_MINUTES,
    DEFAULT_RETRY_DELAY_SECS,
};
use crate::iqamah::{IqamahResolver, IqamahRules};
use crate::schedule::ScheduleSource;
use crate::types::IqamahOffsets;

/// 設定ファイルのエラー型
#[derive(Debug, Error)]
pub enum ConfigError {
    /// ホームディレクトリの取得に失敗
    #[error("Failed to get home directory")]
    HomeDirectoryNotFound,

    /// 設定ファイルが存在しない
    #[error("Config file not found: {0:?}")]
    FileNotFound(PathBuf),

    /// 読み込みに失敗
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSONの解析に失敗
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 値が不正
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// ボード設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// 時刻表の取得元
    pub source: ScheduleSource,
    /// イカーマの標準オフセット
    pub offsets: IqamahOffsets,
    /// Zuhr・Ishaの特別ルール
    pub rules: IqamahRules,
    /// 読み込み時にIshaのアザーンへ加える分
    pub isha_correction_minutes: i32,
    /// 読み込み失敗時の再試行間隔（秒）
    pub retry_delay_secs: u64,
    /// イカーマ後に礼拝中とみなす時間（分）
    pub in_progress_minutes: i64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            source: ScheduleSource::default(),
            offsets: IqamahOffsets::default(),
            rules: IqamahRules::default(),
            isha_correction_minutes: DEFAULT_ISHA_CORRECTION_MINUTES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            in_progress_minutes: DEFAULT_IN_PROGRESS_MINUTES,
        }
    }
}

impl BoardConfig {
    /// 既定の設定ファイルパス（`~/.salat/config.json`）
    pub fn default_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirectoryNotFound)?;
        Ok(home_dir.join(".salat").join("config.json"))
    }

    /// 既定のパスから読み込む。ファイルがなければ既定値
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::default_path()?)
    }

    /// 指定パスから読み込む。ファイルがなければ既定値
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load_from_file(path) {
            Err(ConfigError::FileNotFound(path)) => {
                debug!("設定ファイルが見つかりません。既定値を使います: {:?}", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// 指定パスから読み込んで検証する
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let config: Self = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate().map_err(ConfigError::Invalid)?;

        debug!("設定ファイルを読み込みました: {:?}", path);
        Ok(config)
    }

    /// 設定を検証
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.source.validate()?;
        self.offsets.validate()?;
        self.rules.validate()?;

        if !(-60..=60).contains(&self.isha_correction_minutes) {
            return Err("Isha補正は-60から60分の範囲で指定してください".to_string());
        }
        if !(1..=3600).contains(&self.retry_delay_secs) {
            return Err("再試行間隔は1-3600秒の範囲で指定してください".to_string());
        }
        if !(0..=180).contains(&self.in_progress_minutes) {
            return Err("礼拝中の時間は0-180分の範囲で指定してください".to_string());
        }
        Ok(())
    }

    /// イカーマ解決器を作成
    pub fn resolver(&self) -> IqamahResolver {
        IqamahResolver::new(self.offsets.clone(), self.rules.clone())
    }

    /// エンジンの動作設定に変換
    pub fn settings(&self) -> BoardSettings {
        BoardSettings {
            isha_correction_minutes: self.isha_correction_minutes,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            in_progress_window: TimeDelta::minutes(self.in_progress_minutes),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
