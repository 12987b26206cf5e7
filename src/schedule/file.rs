//! ローカルファイルの時刻表プロバイダー

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::error::{Result, ScheduleError};
use super::{expand_year, parse_year_csv, ScheduleProvider, YearSchedule};

/// 年ごとのCSVファイルを読み込むプロバイダー
#[derive(Debug, Clone)]
pub struct FileScheduleProvider {
    path_template: String,
}

impl FileScheduleProvider {
    /// `{year}` を含むパステンプレートから作成
    pub fn new(path_template: impl Into<String>) -> Self {
        Self {
            path_template: path_template.into(),
        }
    }

    /// 年に対応するファイルパス
    pub fn path_for(&self, year: i32) -> PathBuf {
        PathBuf::from(expand_year(&self.path_template, year))
    }
}

#[async_trait]
impl ScheduleProvider for FileScheduleProvider {
    async fn fetch_year(&self, year: i32) -> Result<YearSchedule> {
        let path = self.path_for(year);
        debug!("時刻表ファイルを読み込みます: {:?}", path);

        let text = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScheduleError::Transport(format!("file not found: {:?}", path)),
            _ => ScheduleError::Transport(format!("{:?}: {}", path, e)),
        })?;

        parse_year_csv(&text)
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fetch_year_reads_expanded_path() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("2025-prayer-time.csv"),
            "date,fajr,zuhr,asr,maghrib,isha\n01-06-2025,04:05,13:50,17:55,21:50,23:30\n",
        )
        .unwrap();

        let template = dir.path().join("{year}-prayer-time.csv");
        let provider = FileScheduleProvider::new(template.to_string_lossy());

        let year = provider.fetch_year(2025).await.unwrap();
        assert_eq!(year.len(), 1);
        assert!(year
            .get(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .is_some());
    }

    #[tokio::test]
    async fn test_fetch_year_missing_file_is_transport_error() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("{year}.csv");
        let provider = FileScheduleProvider::new(template.to_string_lossy());

        let err = provider.fetch_year(2030).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Transport(_)));
        assert!(err.to_string().contains("2030.csv"));
    }

    #[tokio::test]
    async fn test_fetch_year_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("2025.csv"), "not,a,schedule\n1,2,3\n").unwrap();
        let provider = FileScheduleProvider::new(dir.path().join("{year}.csv").to_string_lossy());

        let err = provider.fetch_year(2025).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }
}
