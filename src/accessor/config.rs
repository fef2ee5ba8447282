use std::time::Duration;

/// Environment variable read by [`AccessorConfig::from_env`].
pub const TIME_WINDOW_ENV: &str = "API_ACCESSOR_TIME_WINDOW";

/// Default timestamp skew window in seconds.
pub const DEFAULT_TIME_WINDOW_SECS: u64 = 60;

/// Predefined configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Production-ready configuration.
    ///
    /// - Time window: 1 minute (accounts for network delays and clock skew)
    Production,

    /// Development-friendly configuration.
    ///
    /// - Time window: 2 minutes (more forgiving for local development)
    Development,

    /// High-security configuration.
    ///
    /// - Time window: 30 seconds (strict timing requirements)
    HighSecurity,

    /// Load configuration from environment variables.
    ///
    /// Reads `API_ACCESSOR_TIME_WINDOW` (seconds, default: 60).
    FromEnv,
}

/// Tunable parameters of the built-in validation policies.
///
/// Only the default timestamp checker reads this; a custom checker passed
/// through [`AccessorOptions`](crate::AccessorOptions) ignores it.
///
/// # Example
///
/// ```rust
/// use api_accessor::{AccessorConfig, ConfigPreset};
/// use std::time::Duration;
///
/// let config = AccessorConfig::from(ConfigPreset::HighSecurity);
/// assert_eq!(config.time_window, Duration::from_secs(30));
///
/// let config = AccessorConfig {
///     time_window: Duration::from_secs(300),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AccessorConfig {
    /// Maximum allowed distance between a request's timestamp and now.
    pub time_window: Duration,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            time_window: Duration::from_secs(DEFAULT_TIME_WINDOW_SECS),
        }
    }
}

impl AccessorConfig {
    /// Loads the configuration from `API_ACCESSOR_TIME_WINDOW`.
    ///
    /// Unset or unparseable values fall back to the default window. Any
    /// [`validate`](Self::validate) warnings are logged once here, so resolve
    /// this at startup and reuse the result for every request.
    pub fn from_env() -> Self {
        let config = Self {
            time_window: Duration::from_secs(
                std::env::var(TIME_WINDOW_ENV)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIME_WINDOW_SECS),
            ),
        };
        for warning in config.validate() {
            tracing::warn!("{warning}");
        }
        config
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.time_window.as_secs() < 30 {
            warnings.push(
                "Very short time window (< 30 seconds) may cause clock sync issues".to_string(),
            );
        }
        if self.time_window.as_secs() > 300 {
            warnings
                .push("Long time window (> 5 minutes) may increase replay attack risk".to_string());
        }

        warnings
    }

    /// Returns a summary of the current configuration.
    pub fn summary(&self) -> String {
        format!(
            "AccessorConfig {{ Time Window: {}s }}",
            self.time_window.as_secs()
        )
    }
}

impl From<ConfigPreset> for AccessorConfig {
    fn from(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Production => Self {
                time_window: Duration::from_secs(60),
            },
            ConfigPreset::Development => Self {
                time_window: Duration::from_secs(120),
            },
            ConfigPreset::HighSecurity => Self {
                time_window: Duration::from_secs(30),
            },
            ConfigPreset::FromEnv => Self::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env_vars() {
        unsafe {
            std::env::remove_var(TIME_WINDOW_ENV);
        }
    }

    #[test]
    fn test_production_preset() {
        let config = AccessorConfig::from(ConfigPreset::Production);
        assert_eq!(config.time_window.as_secs(), 60);
    }

    #[test]
    fn test_development_preset() {
        let config = AccessorConfig::from(ConfigPreset::Development);
        assert_eq!(config.time_window.as_secs(), 120);
    }

    #[test]
    fn test_high_security_preset() {
        let config = AccessorConfig::from(ConfigPreset::HighSecurity);
        assert_eq!(config.time_window.as_secs(), 30);
    }

    #[test]
    #[serial]
    fn test_from_env_without_env() {
        clear_env_vars();

        let config = AccessorConfig::from_env();
        assert_eq!(config.time_window.as_secs(), DEFAULT_TIME_WINDOW_SECS);
    }

    #[test]
    #[serial]
    fn test_default_ignores_env() {
        clear_env_vars();
        unsafe {
            std::env::set_var(TIME_WINDOW_ENV, "180");
        }

        let config = AccessorConfig::default();
        assert_eq!(config.time_window.as_secs(), DEFAULT_TIME_WINDOW_SECS);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env_vars();
        unsafe {
            std::env::set_var(TIME_WINDOW_ENV, "180");
        }

        let config = AccessorConfig::from(ConfigPreset::FromEnv);
        assert_eq!(config.time_window.as_secs(), 180);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env_vars();
        unsafe {
            std::env::set_var(TIME_WINDOW_ENV, "five minutes");
        }

        let config = AccessorConfig::from_env();
        assert_eq!(config.time_window.as_secs(), DEFAULT_TIME_WINDOW_SECS);

        clear_env_vars();
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AccessorConfig::from(ConfigPreset::Production);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validation_time_window_warnings() {
        let config = AccessorConfig {
            time_window: Duration::from_secs(15),
        };
        let warnings = config.validate();
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("Very short time window"))
        );

        let config = AccessorConfig {
            time_window: Duration::from_secs(600),
        };
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("Long time window")));
    }

    #[test]
    fn test_summary() {
        let config = AccessorConfig::from(ConfigPreset::Development);
        assert_eq!(config.summary(), "AccessorConfig { Time Window: 120s }");
    }
}
