use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    InvalidArgument(String),
    Validation(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl TrackerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TrackerError::InvalidArgument(_) => "E001",
            TrackerError::Validation(_) => "E002",
            TrackerError::FileOperation(_) => "E003",
            TrackerError::Serialization(_) => "E004",
            TrackerError::Config(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TrackerError::InvalidArgument(_) => "Invalid Argument",
            TrackerError::Validation(_) => "Validation Error",
            TrackerError::FileOperation(_) => "File Operation Error",
            TrackerError::Serialization(_) => "Serialization Error",
            TrackerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TrackerError::InvalidArgument(msg) => msg,
            TrackerError::Validation(msg) => msg,
            TrackerError::FileOperation(msg) => msg,
            TrackerError::Serialization(msg) => msg,
            TrackerError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（终端）
    #[cfg(feature = "cli")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrackerError {}

// 便捷的构造函数
impl TrackerError {
    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        TrackerError::InvalidArgument(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TrackerError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TrackerError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TrackerError::Config(msg.into())
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::FileOperation(err.to_string())
    }
}

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for TrackerError {
    fn from(err: url::ParseError) -> Self {
        TrackerError::Validation(format!("Invalid URL: {}", err))
    }
}

impl From<config::ConfigError> for TrackerError {
    fn from(err: config::ConfigError) -> Self {
        TrackerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
