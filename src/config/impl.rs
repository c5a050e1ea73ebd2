use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Loads the default sources on first use if [`init_config`] was never
/// called, so library consumers always see a valid configuration.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(None)))
        .clone()
}

/// Initialize the global configuration from an explicit value
///
/// Returns `false` if the configuration was already initialized; the
/// existing value is kept in that case.
///
/// # Examples
/// ```no_run
/// use privacy_tracker::config::{StaticConfig, init_config};
/// init_config(StaticConfig::load(Some("config.toml")));
/// ```
pub fn init_config(config: StaticConfig) -> bool {
    CONFIG.set(Arc::new(config)).is_ok()
}
