//! 配置值验证模块

use super::StaticConfig;
use crate::errors::TrackerError;
use crate::utils::time_parser::TimeParser;

const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validate a loaded configuration as a whole
pub fn validate_static_config(config: &StaticConfig) -> Result<(), TrackerError> {
    if config.dataset.window_days == 0 {
        return Err(TrackerError::config(
            "dataset.window_days must be at least 1",
        ));
    }

    TimeParser::parse_utc_offset(&config.display.utc_offset)
        .map_err(|e| TrackerError::config(format!("display.utc_offset: {}", e)))?;

    if config.display.page_size == 0 {
        return Err(TrackerError::config("display.page_size must be at least 1"));
    }

    if config.display.trend_days == 0 {
        return Err(TrackerError::config("display.trend_days must be at least 1"));
    }

    validate_log_format(&config.logging.format).map_err(TrackerError::config)?;

    Ok(())
}

pub fn validate_log_format(format: &str) -> Result<(), String> {
    if VALID_LOG_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(format!(
            "Invalid logging.format: '{}'. Valid: {}",
            format,
            VALID_LOG_FORMATS.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_static_config(&StaticConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = StaticConfig::default();
        config.dataset.window_days = 0;
        assert!(validate_static_config(&config).is_err());
    }

    #[test]
    fn test_non_ascii_offset_is_config_error() {
        let mut config = StaticConfig::default();
        config.display.utc_offset = "+1é1".to_string();
        assert!(matches!(
            validate_static_config(&config),
            Err(TrackerError::Config(_))
        ));
    }

    #[test]
    fn test_log_format() {
        assert!(validate_log_format("json").is_ok());
        assert!(validate_log_format("xml").is_err());
    }
}
