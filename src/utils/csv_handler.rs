//! CSV 导出
//!
//! Format: an unquoted header line, then one line per record with every
//! field double-quoted. Lines are joined with `\n` and there is no trailing
//! newline. Absent optional fields are written as `""`.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analytics::{TrackingRecord, UtmParams};
use crate::errors::TrackerError;
use crate::utils::TimeParser;

pub const CSV_HEADERS: [&str; 13] = [
    "ID",
    "Timestamp",
    "Date",
    "Form Type",
    "UTM Source",
    "UTM Medium",
    "UTM Campaign",
    "UTM Term",
    "UTM Content",
    "Referrer",
    "Device Type",
    "Browser",
    "Country",
];

/// CSV 行数据结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingCsvRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Form Type")]
    pub form_type: String,
    #[serde(rename = "UTM Source")]
    pub utm_source: String,
    #[serde(rename = "UTM Medium")]
    pub utm_medium: String,
    #[serde(rename = "UTM Campaign")]
    pub utm_campaign: String,
    #[serde(rename = "UTM Term")]
    pub utm_term: String,
    #[serde(rename = "UTM Content")]
    pub utm_content: String,
    #[serde(rename = "Referrer")]
    pub referrer: String,
    #[serde(rename = "Device Type")]
    pub device_type: String,
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Country")]
    pub country: String,
}

impl From<&TrackingRecord> for TrackingCsvRow {
    fn from(record: &TrackingRecord) -> Self {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            id: record.id.clone(),
            timestamp: record.timestamp,
            date: TimeParser::to_iso_millis(record.timestamp),
            form_type: record.form_type.to_string(),
            utm_source: opt(&record.utm.source),
            utm_medium: opt(&record.utm.medium),
            utm_campaign: opt(&record.utm.campaign),
            utm_term: opt(&record.utm.term),
            utm_content: opt(&record.utm.content),
            referrer: opt(&record.referrer),
            device_type: record.device_type.to_string(),
            browser: record.browser.clone(),
            country: record.country.clone(),
        }
    }
}

impl TrackingCsvRow {
    /// 转换回 TrackingRecord（form_data 不在导出范围内，恢复为空）
    pub fn into_record(self) -> Result<TrackingRecord, TrackerError> {
        let opt = |v: String| (!v.is_empty()).then_some(v);
        let form_type = self.form_type.parse().map_err(|_| {
            TrackerError::validation(format!("Unknown form type: '{}'", self.form_type))
        })?;
        let device_type = self.device_type.parse().map_err(|_| {
            TrackerError::validation(format!("Unknown device type: '{}'", self.device_type))
        })?;

        Ok(TrackingRecord {
            id: self.id,
            timestamp: self.timestamp,
            form_type,
            utm: UtmParams {
                source: opt(self.utm_source),
                medium: opt(self.utm_medium),
                campaign: opt(self.utm_campaign),
                term: opt(self.utm_term),
                content: opt(self.utm_content),
            },
            referrer: opt(self.referrer),
            device_type,
            browser: self.browser,
            country: self.country,
            form_data: Default::default(),
        })
    }
}

/// Render records as CSV text
pub fn export_to_csv_string(records: &[TrackingRecord]) -> Result<String, TrackerError> {
    let mut buf = Vec::with_capacity(128 * (records.len() + 1));
    buf.extend_from_slice(CSV_HEADERS.join(",").as_bytes());
    buf.push(b'\n');

    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf);

    for record in records {
        csv_writer.serialize(TrackingCsvRow::from(record)).map_err(|e| {
            TrackerError::serialization(format!("Failed to write CSV row: {}", e))
        })?;
    }

    let mut buf = csv_writer
        .into_inner()
        .map_err(|e| TrackerError::serialization(format!("Failed to flush CSV: {}", e)))?;

    // 行之间以 \n 分隔，末尾不留换行
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }

    String::from_utf8(buf)
        .map_err(|e| TrackerError::serialization(format!("CSV is not valid UTF-8: {}", e)))
}

/// Write CSV text to any writer
pub fn write_csv<W: Write>(records: &[TrackingRecord], mut writer: W) -> Result<(), TrackerError> {
    let content = export_to_csv_string(records)?;
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Export to `<dir>/tracking_data_<today>.csv`, returning the written path
pub fn export_to_file<P: AsRef<Path>>(
    records: &[TrackingRecord],
    dir: P,
) -> Result<PathBuf, TrackerError> {
    let dir = dir.as_ref();
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| {
            TrackerError::file_operation(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    let path = dir.join(generate_export_filename());
    let file = std::fs::File::create(&path)
        .map_err(|e| TrackerError::file_operation(format!("Failed to create file: {}", e)))?;
    write_csv(records, std::io::BufWriter::new(file))?;

    info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Parse CSV text produced by [`export_to_csv_string`]
pub fn parse_csv(input: &str) -> Result<Vec<TrackingCsvRow>, TrackerError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<TrackingCsvRow>().enumerate() {
        let row_num = row_idx + 2; // CSV 行号（1-based，跳过 header）
        let row = result.map_err(|e| {
            TrackerError::serialization(format!("Row {}: CSV parse error: {}", row_num, e))
        })?;
        rows.push(row);
    }

    debug!("Parsed {} CSV rows", rows.len());
    Ok(rows)
}

/// 生成导出文件名（UTC 日期）
pub fn generate_export_filename() -> String {
    export_filename_for(Utc::now().date_naive())
}

pub fn export_filename_for(date: NaiveDate) -> String {
    format!("tracking_data_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{DeviceType, FormType};
    use std::collections::BTreeMap;

    fn sample(id: &str, source: Option<&str>) -> TrackingRecord {
        TrackingRecord {
            id: id.to_string(),
            timestamp: 1_717_243_200_123,
            form_type: FormType::DemoRequest,
            utm: UtmParams {
                source: source.map(String::from),
                medium: source.map(|_| "cpc".to_string()),
                campaign: source.map(|_| "summer-sale".to_string()),
                term: None,
                content: None,
            },
            referrer: Some("google.com".to_string()),
            device_type: DeviceType::Tablet,
            browser: "Edge".to_string(),
            country: "DE".to_string(),
            form_data: BTreeMap::new(),
        }
    }

    #[test]
    fn test_header_and_row_layout() {
        let csv = export_to_csv_string(&[sample("entry_1", Some("google"))]).unwrap();
        let mut lines = csv.split('\n');
        assert_eq!(
            lines.next().unwrap(),
            "ID,Timestamp,Date,Form Type,UTM Source,UTM Medium,UTM Campaign,UTM Term,UTM Content,Referrer,Device Type,Browser,Country"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"entry_1\",\"1717243200123\",\"2024-06-01T12:00:00.123Z\",\"Demo Request\",\"google\",\"cpc\",\"summer-sale\",\"\",\"\",\"google.com\",\"Tablet\",\"Edge\",\"DE\""
        );
        assert!(lines.next().is_none());
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = export_to_csv_string(&[]).unwrap();
        assert_eq!(csv, CSV_HEADERS.join(","));
    }

    #[test]
    fn test_parse_back_absent_fields() {
        let csv = export_to_csv_string(&[sample("entry_2", None)]).unwrap();
        let rows = parse_csv(&csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].utm_source, "");
        let record = rows[0].clone().into_record().unwrap();
        assert_eq!(record, sample("entry_2", None));
    }

    #[test]
    fn test_embedded_quote_survives() {
        let mut record = sample("entry_3", Some("google"));
        record.browser = "Fancy \"Browser\", v2".to_string();
        let csv = export_to_csv_string(std::slice::from_ref(&record)).unwrap();
        let rows = parse_csv(&csv).unwrap();
        assert_eq!(rows[0].browser, "Fancy \"Browser\", v2");
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(export_filename_for(date), "tracking_data_2024-06-01.csv");
        let filename = generate_export_filename();
        assert!(filename.starts_with("tracking_data_"));
        assert!(filename.ends_with(".csv"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = export_to_file(&[sample("entry_1", None)], dir.path().join("out")).unwrap();
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ID,Timestamp"));
    }
}
