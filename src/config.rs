use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Pet base API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API root URL, e.g. "https://petbase.example.com/api".
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

/// Traversal tuning configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Sibling fetches in flight per frontier batch.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    /// Overall traversal deadline in seconds; 0 disables it.
    #[serde(default = "default_overall_timeout_secs")]
    pub overall_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: default_fetch_concurrency(),
            overall_timeout_secs: default_overall_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    2
}

fn default_fetch_concurrency() -> usize {
    8
}

fn default_overall_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in PETLINEAGE_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("PETLINEAGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url is not a valid URL: {}", self.api.base_url))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "api.base_url must be an http(s) URL, got scheme: {}",
                parsed.scheme()
            );
        }

        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than 0");
        }

        if self.graph.fetch_concurrency == 0 {
            anyhow::bail!("graph.fetch_concurrency must be greater than 0");
        }

        Ok(())
    }

    /// Per-request fetch timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Overall traversal deadline, if enabled
    pub fn overall_timeout(&self) -> Option<Duration> {
        match self.graph.overall_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(config_path: &std::path::Path, f: impl FnOnce()) {
        let original = std::env::var("PETLINEAGE_CONFIG").ok();
        std::env::set_var("PETLINEAGE_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("PETLINEAGE_CONFIG");
        if let Some(val) = original {
            std::env::set_var("PETLINEAGE_CONFIG", val);
        }
    }

    fn write_config(temp_dir: &TempDir, content: &str) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        config_path
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
[api]
base_url = "https://petbase.example.com/api"
timeout_secs = 10
max_retries = 1

[graph]
fetch_concurrency = 4
overall_timeout_secs = 60
"#,
        );
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.api.timeout_secs, 10);
            assert_eq!(config.api.max_retries, 1);
            assert_eq!(config.graph.fetch_concurrency, 4);
            assert_eq!(config.overall_timeout(), Some(Duration::from_secs(60)));
        });
    }

    #[test]
    fn test_config_defaults_applied() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
[api]
base_url = "http://localhost:8080"
"#,
        );
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.api.timeout_secs, 30);
            assert_eq!(config.api.max_retries, 2);
            assert_eq!(config.graph.fetch_concurrency, 8);
            assert_eq!(config.graph.overall_timeout_secs, 120);
        });
    }

    #[test]
    fn test_config_zero_timeout_disables_deadline() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
[api]
base_url = "http://localhost:8080"

[graph]
overall_timeout_secs = 0
"#,
        );
        with_config_env(&config_path, || {
            let config = Config::load().unwrap();
            assert_eq!(config.overall_timeout(), None);
        });
    }

    #[test]
    fn test_config_rejects_bad_base_url() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
[api]
base_url = "not a url"
"#,
        );
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
        });
    }

    #[test]
    fn test_config_rejects_zero_concurrency() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
[api]
base_url = "http://localhost:8080"

[graph]
fetch_concurrency = 0
"#,
        );
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config
                .unwrap_err()
                .to_string()
                .contains("fetch_concurrency"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("PETLINEAGE_CONFIG").ok();
        std::env::set_var("PETLINEAGE_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("PETLINEAGE_CONFIG");
        if let Some(v) = original {
            std::env::set_var("PETLINEAGE_CONFIG", v);
        }
    }
}
