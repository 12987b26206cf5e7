//! 年間時刻表CSVのパーサー
//!
//! 1行目がヘッダー（`date,fajr,zuhr,asr,maghrib,isha`）のCSVを読み込む。
//! 日付は `DD-MM-YYYY` 形式。余分な列は無視する。

use std::collections::HashMap;

use ::csv::StringRecord;
use tracing::debug;

use super::error::{Result, ScheduleError};
use super::{ScheduleRecord, YearSchedule};

/// 必須の列名
const REQUIRED_COLUMNS: [&str; 6] = ["date", "fajr", "zuhr", "asr", "maghrib", "isha"];

/// ヘッダーから求めた各列の位置
struct ColumnIndex([usize; 6]);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut index = [0usize; 6];
        for (slot, column) in index.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == column)
                .ok_or_else(|| {
                    ScheduleError::Parse(format!("missing column {:?} in CSV header", column))
                })?;
        }
        Ok(Self(index))
    }

    /// 列の値（行が短い場合は空文字列）
    fn field(&self, record: &StringRecord, column: usize) -> String {
        record.get(self.0[column]).unwrap_or("").to_string()
    }
}

/// CSVテキストを年間時刻表に変換
///
/// 空行と日付が空の行は読み飛ばす。列が足りない行も取り込み、
/// 時刻の形式はその日を取り出すときに検証する。
pub fn parse_year_csv(text: &str) -> Result<YearSchedule> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ScheduleError::Parse(format!("failed to read CSV header: {}", e)))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut entries = HashMap::new();
    let mut skipped = 0usize;

    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| ScheduleError::Parse(format!("row {}: {}", index + 2, e)))?;
        let date = columns.field(&record, 0);
        if date.is_empty() {
            skipped += 1;
            continue;
        }

        entries.insert(
            date,
            ScheduleRecord {
                fajr: columns.field(&record, 1),
                zuhr: columns.field(&record, 2),
                asr: columns.field(&record, 3),
                maghrib: columns.field(&record, 4),
                isha: columns.field(&record, 5),
            },
        );
    }

    debug!(
        "CSVを読み込みました: {} 日分 ({} 行スキップ)",
        entries.len(),
        skipped
    );

    Ok(YearSchedule::new(entries))
}
