//! HTTP経由の時刻表プロバイダー

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use super::error::{Result, ScheduleError};
use super::{expand_year, parse_year_csv, ScheduleProvider, YearSchedule};

/// 年ごとのCSVをHTTPで取得するプロバイダー
///
/// キャッシュを回避するため、リクエストごとに `t=<unix millis>` を付与する。
#[derive(Debug, Clone)]
pub struct HttpScheduleProvider {
    url_template: String,
    client: reqwest::Client,
}

impl HttpScheduleProvider {
    /// `{year}` を含むURLテンプレートから作成
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            client: reqwest::Client::new(),
        }
    }

    /// リクエストURLを組み立てる
    pub fn request_url(&self, year: i32, cache_buster: i64) -> String {
        let url = expand_year(&self.url_template, year);
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", url, separator, cache_buster)
    }
}

#[async_trait]
impl ScheduleProvider for HttpScheduleProvider {
    async fn fetch_year(&self, year: i32) -> Result<YearSchedule> {
        let url = self.request_url(year, Utc::now().timestamp_millis());
        debug!("時刻表を取得します: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScheduleError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("時刻表の取得に失敗しました: HTTP {}", status.as_u16());
            return Err(ScheduleError::Transport(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScheduleError::Transport(e.to_string()))?;

        parse_year_csv(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_appends_cache_buster() {
        let provider = HttpScheduleProvider::new("https://example.com/{year}-prayer-time.csv");
        assert_eq!(
            provider.request_url(2026, 1700000000000),
            "https://example.com/2026-prayer-time.csv?t=1700000000000"
        );
    }

    #[test]
    fn test_request_url_with_existing_query() {
        let provider = HttpScheduleProvider::new("https://example.com/times.csv?year={year}");
        assert_eq!(
            provider.request_url(2025, 42),
            "https://example.com/times.csv?year=2025&t=42"
        );
    }

    #[test]
    fn test_provider_name() {
        let provider = HttpScheduleProvider::new("https://example.com/{year}.csv");
        assert_eq!(provider.name(), "http");
    }
}
