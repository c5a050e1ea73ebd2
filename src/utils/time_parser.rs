use chrono::{DateTime, FixedOffset, SecondsFormat};

/// 时间解析与格式化工具
pub struct TimeParser;

impl TimeParser {
    /// 解析 UTC 偏移量，支持多种格式：
    /// - `Z` / `UTC`
    /// - `+08:00`, `-05:30`
    /// - `+0800`, `-0530`
    /// - `+8`, `-5`
    pub fn parse_utc_offset(input: &str) -> Result<FixedOffset, String> {
        let input = input.trim();

        if input.eq_ignore_ascii_case("z") || input.eq_ignore_ascii_case("utc") {
            return FixedOffset::east_opt(0).ok_or_else(|| "无效的时区偏移".to_string());
        }

        let (sign, rest) = match input.as_bytes().first() {
            Some(b'+') => (1, &input[1..]),
            Some(b'-') => (-1, &input[1..]),
            _ => {
                return Err(format!(
                    "无效的时区偏移: '{}'，应以 + 或 - 开头，例如 +08:00",
                    input
                ));
            }
        };

        let (hours_str, minutes_str) = if let Some((h, m)) = rest.split_once(':') {
            (h, m)
        } else if rest.len() == 4 {
            match (rest.get(..2), rest.get(2..)) {
                (Some(h), Some(m)) => (h, m),
                _ => return Err(format!("无效的时区偏移: '{}'", input)),
            }
        } else {
            (rest, "0")
        };

        let hours: i32 = hours_str
            .parse()
            .map_err(|_| format!("无效的小时数: '{}'", hours_str))?;
        let minutes: i32 = minutes_str
            .parse()
            .map_err(|_| format!("无效的分钟数: '{}'", minutes_str))?;

        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(format!("时区偏移超出范围: '{}'", input));
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .ok_or_else(|| format!("时区偏移超出范围: '{}'", input))
    }

    /// ISO-8601 UTC with millisecond precision, e.g. `2024-06-01T12:00:00.000Z`
    pub fn to_iso_millis(timestamp_ms: i64) -> String {
        DateTime::from_timestamp_millis(timestamp_ms)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Table-style timestamp in the display offset, e.g. `Jun 01, 2024 08:00 PM`
    pub fn format_display(timestamp_ms: i64, offset: &FixedOffset) -> String {
        DateTime::from_timestamp_millis(timestamp_ms)
            .unwrap_or_default()
            .with_timezone(offset)
            .format("%b %d, %Y %I:%M %p")
            .to_string()
    }
}
