use crate::constants::{
    DEFAULT_BIOGRAPHY_URL_CH, DEFAULT_BIOGRAPHY_URL_EN, DEFAULT_BIOGRAPHY_YEAR, DEFAULT_DATA_DIR,
    DEFAULT_SESSIONS,
};
use crate::error::{Result, ScraperError};
use crate::types::Language;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATA_DIR_ENV: &str = "LEGCO_DATA_DIR";
pub const PUSHGATEWAY_ENV: &str = "LEGCO_PUSHGATEWAY_URL";

/// Run configuration. Every section falls back to the built-in defaults when omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub biography_pages: Vec<BiographyPageConfig>,
    pub sessions: Vec<SessionConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BiographyPageConfig {
    pub year: String,
    pub urls: Vec<PageUrl>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageUrl {
    pub language: Language,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    pub year: String,
    pub url: String,
    /// JSON array of members used to resolve vote ids, e.g. a previous `all.json`
    #[serde(default)]
    pub members_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            biography_pages: default_biography_pages(),
            sessions: default_sessions(),
        }
    }
}

fn default_biography_pages() -> Vec<BiographyPageConfig> {
    vec![BiographyPageConfig {
        year: DEFAULT_BIOGRAPHY_YEAR.to_string(),
        urls: vec![
            PageUrl {
                language: Language::Ch,
                url: DEFAULT_BIOGRAPHY_URL_CH.to_string(),
            },
            PageUrl {
                language: Language::En,
                url: DEFAULT_BIOGRAPHY_URL_EN.to_string(),
            },
        ],
    }]
}

fn default_sessions() -> Vec<SessionConfig> {
    DEFAULT_SESSIONS
        .iter()
        .map(|(year, url)| SessionConfig {
            year: year.to_string(),
            url: url.to_string(),
            members_file: None,
        })
        .collect()
}

impl Config {
    /// Loads the TOML file at `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `LEGCO_DATA_DIR` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        self
    }

    fn validate(&self) -> Result<()> {
        for page in &self.biography_pages {
            if page.urls.is_empty() {
                return Err(ScraperError::Config(format!(
                    "biography page {} lists no urls",
                    page.year
                )));
            }
        }
        for session in &self.sessions {
            if session.year.is_empty() {
                return Err(ScraperError::Config(format!(
                    "session with url {} has no year",
                    session.url
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.biography_pages[0].year, "1216");
        assert_eq!(config.sessions.len(), 2);
        assert_eq!(config.sessions[0].year, "1314");
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::from_toml(
            r#"
            data_dir = "out"

            [[biography_pages]]
            year = "1620"
            urls = [
                { language = "ch", url = "http://example.org/ch/biographies.htm" },
                { language = "en", url = "http://example.org/en/biographies.htm" },
            ]

            [[sessions]]
            year = "1617"
            url = "http://example.org/mtg_1617.htm"
            members_file = "data/member-json/all.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("out"));
        assert_eq!(config.biography_pages[0].urls[1].language, Language::En);
        assert_eq!(
            config.sessions[0].members_file.as_deref(),
            Some(Path::new("data/member-json/all.json"))
        );
    }

    #[test]
    fn test_rejects_page_without_urls() {
        let err = Config::from_toml(
            r#"
            [[biography_pages]]
            year = "1216"
            urls = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
