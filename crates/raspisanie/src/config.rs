/// Configuration for fetching and for the known schedule sources
use crate::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub sources: SourcesConfig,
}

/// HTTP settings handed to the fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Where each source lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Page of an embedded-data source; `{slug}` is replaced by the source id
    pub embedded_url_template: String,
    /// Group listing of the table source; group pages live under it
    pub table_groups_url: String,
    /// Source ids served by the table strategy
    pub table_slugs: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            embedded_url_template: "https://dnevuch.ru/raspisanie-{slug}".to_string(),
            table_groups_url: "https://togudv.ru/rasp/groups/".to_string(),
            table_slugs: vec!["togu".to_string()],
        }
    }
}

impl Config {
    /// Loads a JSON configuration file. Missing keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScheduleError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| ScheduleError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_url(
            "sources.embedded_url_template",
            &self.sources.embedded_url_template.replace("{slug}", "slug"),
        )?;
        if !self.sources.embedded_url_template.contains("{slug}") {
            return Err(ScheduleError::Config {
                message: "sources.embedded_url_template must contain {slug}".to_string(),
            });
        }
        validate_url("sources.table_groups_url", &self.sources.table_groups_url)?;
        if self.fetcher.timeout_secs == 0 || self.fetcher.connect_timeout_secs == 0 {
            return Err(ScheduleError::Config {
                message: "fetcher timeouts must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| ScheduleError::Config {
        message: format!("{field}: invalid URL {value:?}: {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ScheduleError::Config {
            message: format!("{field}: unsupported URL scheme {scheme}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetcher.timeout(), Duration::from_secs(30));
        assert_eq!(config.sources.table_slugs, vec!["togu".to_string()]);
    }

    #[test]
    fn test_template_without_slug_is_rejected() {
        let mut config = Config::default();
        config.sources.embedded_url_template = "https://dnevuch.ru/raspisanie".to_string();
        assert!(config.validate().is_err());

        config.sources.embedded_url_template = "ftp://dnevuch.ru/{slug}".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fetcher": {{"timeout_secs": 5}}}}"#).unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.fetcher.timeout_secs, 5);
        assert_eq!(config.fetcher.connect_timeout_secs, 10);
        assert_eq!(
            config.sources.table_groups_url,
            "https://togudv.ru/rasp/groups/"
        );
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(ScheduleError::Config { .. })
        ));
    }
}
