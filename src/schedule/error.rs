//! 時刻表読み込みのエラー型定義

use thiserror::Error;

/// 時刻表読み込みのエラー
///
/// どのエラーも呼び出し側では同じく「時刻表なし」として扱い、再試行に回す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// 取得元に到達できない、または存在しない
    #[error("schedule source unavailable: {0}")]
    Transport(String),

    /// 内容が不正
    #[error("malformed schedule: {0}")]
    Parse(String),

    /// 読み込めたが当日の行がない
    #[error("no prayer times for {0}")]
    MissingDate(String),
}

impl ScheduleError {
    /// ログ・イベント用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::Transport(_) => "transport",
            ScheduleError::Parse(_) => "parse",
            ScheduleError::MissingDate(_) => "missing_date",
        }
    }
}

/// 時刻表操作の結果型
pub type Result<T> = std::result::Result<T, ScheduleError>;
