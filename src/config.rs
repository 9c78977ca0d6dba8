use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/vsfetch/vsfetch.toml";

/// Sink for pilot track points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackedConfig {
    pub base_url: String,
    /// Request timeout in seconds, fractional values allowed.
    pub timeout: f64,
}

impl Default for TrackedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9441".to_string(),
            timeout: 3.0,
        }
    }
}

impl TrackedConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}

/// Versioned object store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionedConfig {
    pub base_url: String,
    pub timeout: f64,
}

impl Default for VersionedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9440".to_string(),
            timeout: 3.0,
        }
    }
}

impl VersionedConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}

/// Defaults for requests against public feeds (VATSIM data, VATSpy data,
/// OurAirports runway map).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    pub timeout: f64,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self { timeout: 3.0 }
    }
}

impl ExternalConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}

/// Upstream feed locations and loop pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub data_url: String,
    pub fixed_data_url: String,
    pub boundaries_url: String,
    pub runways_url: String,
    /// Sleep after a snapshot was processed.
    pub poll_interval_secs: u64,
    /// Sleep when the feed had nothing newer.
    pub idle_interval_secs: u64,
    /// Sleep after a failed cycle before retrying.
    pub retry_interval_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_url: "https://data.vatsim.net/v3/vatsim-data.json".to_string(),
            fixed_data_url:
                "https://raw.githubusercontent.com/vatsimnetwork/vatspy-data-project/master/VATSpy.dat"
                    .to_string(),
            boundaries_url:
                "https://raw.githubusercontent.com/vatsimnetwork/vatspy-data-project/master/Boundaries.geojson"
                    .to_string(),
            runways_url:
                "https://raw.githubusercontent.com/viert/ourairports-json/main/output/runway_split_map.json"
                    .to_string(),
            poll_interval_secs: 10,
            idle_interval_secs: 3,
            retry_interval_secs: 10,
        }
    }
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracked: TrackedConfig,
    pub versioned: VersionedConfig,
    pub external: ExternalConfig,
    pub source: SourceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// An unreadable file is logged and falls back to defaults so the daemon
    /// can be started without any configuration at all; a file that exists
    /// but does not parse is a hard error.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                error!("error reading config {}: {}, using defaults", path.display(), err);
                return Ok(Config::default());
            }
        };

        let config: Config = toml::from_str(&raw)
            .map_err(|err| AppError::ConfigError(format!("invalid config {}: {}", path.display(), err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tracked.base_url", &self.tracked.base_url),
            ("versioned.base_url", &self.versioned.base_url),
            ("source.data_url", &self.source.data_url),
            ("source.fixed_data_url", &self.source.fixed_data_url),
            ("source.boundaries_url", &self.source.boundaries_url),
            ("source.runways_url", &self.source.runways_url),
        ] {
            Url::parse(value)
                .map_err(|err| AppError::ConfigError(format!("{} is not a valid URL: {}", name, err)))?;
        }

        for (name, value) in [
            ("tracked.timeout", self.tracked.timeout),
            ("versioned.timeout", self.versioned.timeout),
            ("external.timeout", self.external.timeout),
        ] {
            if value <= 0.0 {
                return Err(AppError::ConfigError(format!("{} must be greater than zero", name)));
            }
        }

        for (name, value) in [
            ("source.poll_interval_secs", self.source.poll_interval_secs),
            ("source.idle_interval_secs", self.source.idle_interval_secs),
            ("source.retry_interval_secs", self.source.retry_interval_secs),
        ] {
            if value == 0 {
                return Err(AppError::ConfigError(format!("{} must be greater than zero", name)));
            }
        }

        Ok(())
    }
}

/// Resolve the config file path: CLI flag first, then the `APP_CONFIG`
/// environment variable, then the packaged default.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| std::env::var_os("APP_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tracked.base_url, "http://localhost:9441");
        assert_eq!(config.versioned.base_url, "http://localhost:9440");
        assert_eq!(config.external.timeout, 3.0);
        assert_eq!(config.source.data_url, "https://data.vatsim.net/v3/vatsim-data.json");
        assert_eq!(config.source.poll_interval_secs, 10);
        assert_eq!(config.source.idle_interval_secs, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[tracked]
base_url = "http://tracked.internal:9441"
timeout = 1.5

[versioned]
base_url = "http://versioned.internal:9440"

[source]
poll_interval_secs = 30
"#
        )
        .unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.tracked.base_url, "http://tracked.internal:9441");
        assert_eq!(config.tracked.timeout, 1.5);
        assert_eq!(config.versioned.base_url, "http://versioned.internal:9440");
        // Fields absent from a partially specified table keep their defaults.
        assert_eq!(config.versioned.timeout, 3.0);
        assert_eq!(config.source.poll_interval_secs, 30);
        assert_eq!(config.source.idle_interval_secs, 3);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/vsfetch.toml")).unwrap();
        assert_eq!(config.tracked.base_url, "http://localhost:9441");
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[tracked\nbase_url = nope").unwrap();
        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut config = Config::default();
        config.tracked.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let mut config = Config::default();
        config.source.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_config_path() {
        let explicit = resolve_config_path(Some(PathBuf::from("/tmp/custom.toml")));
        assert_eq!(explicit, PathBuf::from("/tmp/custom.toml"));

        std::env::set_var("APP_CONFIG", "/tmp/from-env.toml");
        let from_env = resolve_config_path(None);
        std::env::remove_var("APP_CONFIG");
        assert_eq!(from_env, PathBuf::from("/tmp/from-env.toml"));

        let fallback = resolve_config_path(None);
        assert_eq!(fallback, PathBuf::from(DEFAULT_CONFIG_PATH));
    }
}
