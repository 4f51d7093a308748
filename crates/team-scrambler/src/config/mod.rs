use crate::teams::{GroupSizing, SizingConfig};
use std::env;
use std::fmt;

const DEFAULT_TEAM_COUNT: usize = 4;
const DEFAULT_TEAM_SIZE: usize = 5;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scrambler: ScramblerDefaults,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let team_count = env::var("SCRAMBLER_TEAM_COUNT")
            .unwrap_or_else(|_| DEFAULT_TEAM_COUNT.to_string())
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidTeamCount)?;
        let team_size = env::var("SCRAMBLER_TEAM_SIZE")
            .unwrap_or_else(|_| DEFAULT_TEAM_SIZE.to_string())
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidTeamSize)?;

        let mode = match env::var("SCRAMBLER_MODE") {
            Ok(value) => SizingMode::parse(&value)?,
            Err(_) => SizingMode::TeamCount,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scrambler: ScramblerDefaults {
                mode,
                team_count,
                team_size,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Which configured value sizes the groups when no explicit size is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingMode {
    TeamCount,
    TeamSize,
}

impl SizingMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "count" | "team_count" | "teamcount" => Ok(Self::TeamCount),
            "size" | "team_size" | "teamsize" => Ok(Self::TeamSize),
            _ => Err(ConfigError::InvalidMode(value.to_string())),
        }
    }
}

/// Sizing used when the caller does not pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScramblerDefaults {
    pub mode: SizingMode,
    pub team_count: usize,
    pub team_size: usize,
}

impl Default for ScramblerDefaults {
    fn default() -> Self {
        Self {
            mode: SizingMode::TeamCount,
            team_count: DEFAULT_TEAM_COUNT,
            team_size: DEFAULT_TEAM_SIZE,
        }
    }
}

impl ScramblerDefaults {
    /// An explicit team size wins over an explicit team count. Without either,
    /// `mode` picks the configured count or the configured size.
    pub fn sizing(
        &self,
        balance_fields: Vec<String>,
        team_count: Option<usize>,
        team_size: Option<usize>,
    ) -> SizingConfig {
        let sizing = match (team_size, team_count) {
            (Some(size), _) => GroupSizing::TeamSize(size),
            (None, Some(count)) => GroupSizing::TeamCount(count),
            (None, None) => match self.mode {
                SizingMode::TeamCount => GroupSizing::TeamCount(self.team_count),
                SizingMode::TeamSize => GroupSizing::TeamSize(self.team_size),
            },
        };

        SizingConfig {
            sizing,
            balance_fields,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTeamCount,
    InvalidTeamSize,
    InvalidMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTeamCount => {
                write!(f, "SCRAMBLER_TEAM_COUNT must be a non-negative integer")
            }
            ConfigError::InvalidTeamSize => {
                write!(f, "SCRAMBLER_TEAM_SIZE must be a non-negative integer")
            }
            ConfigError::InvalidMode(value) => {
                write!(f, "SCRAMBLER_MODE must be 'count' or 'size', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("SCRAMBLER_TEAM_COUNT");
        env::remove_var("SCRAMBLER_TEAM_SIZE");
        env::remove_var("SCRAMBLER_MODE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.scrambler, ScramblerDefaults::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_reads_scrambler_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "CI");
        env::set_var("SCRAMBLER_TEAM_COUNT", " 6 ");
        env::set_var("SCRAMBLER_TEAM_SIZE", "3");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.scrambler.team_count, 6);
        assert_eq!(config.scrambler.team_size, 3);
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_team_count() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCRAMBLER_TEAM_COUNT", "four");
        let error = AppConfig::load().expect_err("team count must be numeric");
        assert!(matches!(error, ConfigError::InvalidTeamCount));
        reset_env();
    }

    #[test]
    fn sizing_prefers_team_size_then_count_then_default() {
        let defaults = ScramblerDefaults::default();
        let fields = vec!["gender".to_string()];

        let by_size = defaults.sizing(fields.clone(), Some(3), Some(6));
        assert_eq!(by_size.sizing, GroupSizing::TeamSize(6));

        let by_count = defaults.sizing(fields.clone(), Some(3), None);
        assert_eq!(by_count.sizing, GroupSizing::TeamCount(3));

        let fallback = defaults.sizing(fields, None, None);
        assert_eq!(fallback.sizing, GroupSizing::TeamCount(DEFAULT_TEAM_COUNT));
        assert_eq!(fallback.balance_fields, vec!["gender".to_string()]);
    }

    #[test]
    fn size_mode_sizes_groups_by_configured_team_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCRAMBLER_MODE", "size");
        env::set_var("SCRAMBLER_TEAM_COUNT", "4");
        env::set_var("SCRAMBLER_TEAM_SIZE", "3");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.scrambler.mode, SizingMode::TeamSize);
        let fallback = config.scrambler.sizing(Vec::new(), None, None);
        assert_eq!(fallback.sizing, GroupSizing::TeamSize(3));

        let explicit = config.scrambler.sizing(Vec::new(), Some(2), None);
        assert_eq!(explicit.sizing, GroupSizing::TeamCount(2));
    }

    #[test]
    fn rejects_unknown_sizing_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCRAMBLER_MODE", "pairs");
        let error = AppConfig::load().expect_err("mode must be count or size");
        reset_env();
        assert!(matches!(error, ConfigError::InvalidMode(ref value) if value == "pairs"));
    }
}
