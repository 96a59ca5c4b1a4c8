//! Configuration loading for the Trackboard TUI.
//!
//! All fields are required. No defaults.

use crate::theme::ThemeName;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    pub dashboard_table_limit: usize,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or TRACKBOARD_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(invalid("api_base_url", "must start with http:// or https://"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be > 0"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(invalid("refresh_interval_ms", "must be > 0"));
        }
        if self.dashboard_table_limit == 0 {
            return Err(invalid("dashboard_table_limit", "must be > 0"));
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(invalid("persistence_path", "must not be empty"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(invalid("log_path", "must not be empty"));
        }
        if self.log_filter.trim().is_empty() {
            return Err(invalid("log_filter", "must not be empty"));
        }
        if self.theme.name.trim().is_empty() {
            return Err(invalid("theme.name", "must not be empty"));
        }
        if self.theme_name().is_none() {
            return Err(invalid("theme.name", "expected 'slate' or 'mono'"));
        }
        Ok(())
    }

    pub fn theme_name(&self) -> Option<ThemeName> {
        ThemeName::parse(&self.theme.name)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("TRACKBOARD_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
api_base_url = "http://localhost:5000"
request_timeout_ms = 5000
refresh_interval_ms = 30000
dashboard_table_limit = 10
persistence_path = "tmp/trackboard-state.json"
log_path = "tmp/trackboard.log"
log_filter = "trackboard_tui=info"

[theme]
name = "slate"
"#;

    #[test]
    fn parses_and_validates_sample() {
        let config = TuiConfig::parse(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.refresh_interval_ms, 30_000);
        assert_eq!(config.theme_name(), Some(ThemeName::Slate));
    }

    #[test]
    fn rejects_unknown_fields() {
        let contents = format!("{SAMPLE}\nextra = true\n");
        assert!(matches!(TuiConfig::parse(&contents), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_missing_fields() {
        let contents = SAMPLE.replace("dashboard_table_limit = 10\n", "");
        assert!(matches!(TuiConfig::parse(&contents), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_unknown_theme() {
        let contents = SAMPLE.replace("\"slate\"", "\"neon\"");
        let config = TuiConfig::parse(&contents).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "theme.name", .. })
        ));
    }
}
