//! Runtime configuration loaded from environment variables.
//!
//! Every variable is optional; blank values count as unset.

use crate::logging::{default_log_level, normalize_level};
use crate::notify::DEFAULT_TOPIC;
use crate::pagination::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SETMAKER_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "SETMAKER_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SETMAKER_LOG_DIR";
pub const DEFAULT_PAGE_SIZE_VAR: &str = "SETMAKER_DEFAULT_PAGE_SIZE";
pub const MAX_PAGE_SIZE_VAR: &str = "SETMAKER_MAX_PAGE_SIZE";
pub const EVENT_TOPIC_VAR: &str = "SETMAKER_EVENT_TOPIC";

/// Configuration value rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} `{}`: {}", self.var, self.value, self.reason)
    }
}

impl Error for ConfigError {}

/// Logging settings consumed by `logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Absolute directory for rolling files; `None` logs to stderr.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` uses an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log: LogConfig,
    pub page_limits: PageLimits,
    /// Topic artist-created events are published to.
    pub event_topic: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log: LogConfig::default(),
            page_limits: PageLimits::default(),
            event_topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_VAR) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(level) = read(LOG_LEVEL_VAR) {
            let normalized = normalize_level(&level).map_err(|err| ConfigError {
                var: LOG_LEVEL_VAR,
                value: level.clone(),
                reason: err.to_string(),
            })?;
            config.log.level = normalized.to_string();
        }

        if let Some(dir) = read(LOG_DIR_VAR) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError {
                    var: LOG_DIR_VAR,
                    value: dir,
                    reason: "path must be absolute".to_string(),
                });
            }
            config.log.dir = Some(path);
        }

        let max_size = parse_page_size(MAX_PAGE_SIZE_VAR, read(MAX_PAGE_SIZE_VAR))?
            .unwrap_or(MAX_PAGE_SIZE);
        let default_size = parse_page_size(DEFAULT_PAGE_SIZE_VAR, read(DEFAULT_PAGE_SIZE_VAR))?
            .unwrap_or_else(|| DEFAULT_PAGE_SIZE.min(max_size));
        if default_size > max_size {
            return Err(ConfigError {
                var: DEFAULT_PAGE_SIZE_VAR,
                value: default_size.to_string(),
                reason: format!("must not exceed {MAX_PAGE_SIZE_VAR} ({max_size})"),
            });
        }
        config.page_limits = PageLimits::new(default_size, max_size);

        if let Some(topic) = read(EVENT_TOPIC_VAR) {
            config.event_topic = topic;
        }

        Ok(config)
    }
}

fn parse_page_size(var: &'static str, raw: Option<String>) -> Result<Option<u32>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(0) => Err(ConfigError {
            var,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(value) => Ok(Some(value)),
        Err(err) => Err(ConfigError {
            var,
            value: raw,
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DEFAULT_PAGE_SIZE_VAR, LOG_DIR_VAR, MAX_PAGE_SIZE_VAR};
    use crate::logging::default_log_level;
    use crate::pagination::PageLimits;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(vars: &[(&str, &str)]) -> Result<CoreConfig, super::ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.db_path, None);
        assert_eq!(config.log.level, default_log_level());
        assert_eq!(config.log.dir, None);
        assert_eq!(config.page_limits, PageLimits::new(25, 100));
        assert_eq!(config.event_topic, "create-artist");
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("SETMAKER_DB_PATH", "/var/lib/setmaker/catalog.db"),
            ("SETMAKER_LOG_LEVEL", " WARNING "),
            ("SETMAKER_LOG_DIR", "/var/log/setmaker"),
            ("SETMAKER_DEFAULT_PAGE_SIZE", "10"),
            ("SETMAKER_MAX_PAGE_SIZE", "50"),
            ("SETMAKER_EVENT_TOPIC", "artists"),
        ])
        .unwrap();

        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/setmaker/catalog.db"))
        );
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.dir, Some(PathBuf::from("/var/log/setmaker")));
        assert_eq!(config.page_limits, PageLimits::new(10, 50));
        assert_eq!(config.event_topic, "artists");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("SETMAKER_DB_PATH", "  "), ("SETMAKER_EVENT_TOPIC", "")]).unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.event_topic, "create-artist");
    }

    #[test]
    fn small_max_lowers_implicit_default() {
        let config = load(&[(MAX_PAGE_SIZE_VAR, "10")]).unwrap();
        assert_eq!(config.page_limits, PageLimits::new(10, 10));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = load(&[(DEFAULT_PAGE_SIZE_VAR, "ten")]).unwrap_err();
        assert_eq!(err.var, DEFAULT_PAGE_SIZE_VAR);

        let err = load(&[(MAX_PAGE_SIZE_VAR, "0")]).unwrap_err();
        assert_eq!(err.var, MAX_PAGE_SIZE_VAR);

        let err = load(&[(DEFAULT_PAGE_SIZE_VAR, "60"), (MAX_PAGE_SIZE_VAR, "50")]).unwrap_err();
        assert_eq!(err.var, DEFAULT_PAGE_SIZE_VAR);

        let err = load(&[(LOG_DIR_VAR, "logs")]).unwrap_err();
        assert_eq!(err.var, LOG_DIR_VAR);

        let err = load(&[("SETMAKER_LOG_LEVEL", "loud")]).unwrap_err();
        assert!(err.to_string().contains("SETMAKER_LOG_LEVEL"));
    }
}
