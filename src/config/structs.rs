use serde::{Deserialize, Serialize};

use crate::analytics::generator::{DEFAULT_DATASET_SIZE, DEFAULT_WINDOW_DAYS};
use crate::errors::TrackerError;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PT";
/// 默认配置文件
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - dataset: 模拟数据集大小、随机种子、时间窗口
/// - display: 展示相关（时区偏移、分页、趋势天数）
/// - export: CSV 导出目录
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值
    /// ENV 前缀：PT，分隔符：__
    /// 示例：PT__DATASET__SIZE=500
    ///
    /// Falls back to defaults (with a notice on stderr) when the sources
    /// cannot be read or deserialized.
    pub fn load(path: Option<&str>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[ERROR] {}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces errors, including validation
    pub fn try_load(path: Option<&str>) -> Result<Self, TrackerError> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        super::validators::validate_static_config(self)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), TrackerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TrackerError::serialization(format!("Failed to encode config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 数据集配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_size")]
    pub size: usize,
    /// Fixed seed for a reproducible dataset; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

/// 展示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// UTC offset used for calendar-day grouping, e.g. "+08:00"
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_trend_days")]
    pub trend_days: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// 导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_dataset_size() -> usize {
    DEFAULT_DATASET_SIZE
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_trend_days() -> usize {
    14
}

fn default_top_n() -> usize {
    5
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            size: default_dataset_size(),
            seed: None,
            window_days: default_window_days(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
            page_size: default_page_size(),
            trend_days: default_trend_days(),
            top_n: default_top_n(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.dataset.size, 150);
        assert_eq!(config.dataset.window_days, 30);
        assert!(config.dataset.seed.is_none());
        assert_eq!(config.display.utc_offset, "+00:00");
        assert_eq!(config.display.trend_days, 14);
        assert_eq!(config.display.page_size, 10);
    }

    #[test]
    fn test_sample_config_roundtrip() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[dataset]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.dataset.size, 150);
        assert_eq!(parsed.logging.format, "text");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str("[dataset]\nseed = 42\n").unwrap();
        assert_eq!(parsed.dataset.seed, Some(42));
        assert_eq!(parsed.dataset.size, 150);
        assert_eq!(parsed.display.top_n, 5);
    }

    #[test]
    fn test_try_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tracker.toml");
        std::fs::write(&path, "[dataset]\nsize = 12\nseed = 7\n").unwrap();

        let config = StaticConfig::try_load(path.to_str()).unwrap();
        assert_eq!(config.dataset.size, 12);
        assert_eq!(config.dataset.seed, Some(7));
    }

    #[test]
    fn test_try_load_rejects_bad_offset() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[display]\nutc_offset = \"nowhere\"\n").unwrap();

        let err = StaticConfig::try_load(path.to_str()).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        StaticConfig::default().save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("utc_offset"));
    }
}
