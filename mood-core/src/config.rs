use crate::{ConfigError, CorpusLimits, DEFAULT_COMMENT_LIMIT, DEFAULT_POST_LIMIT};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str = "reddit-mood/0.1";
/// Reddit listings never return more than this many items per request.
pub const MAX_LISTING_LIMIT: usize = 100;

pub const ENV_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const ENV_USER_AGENT: &str = "REDDIT_USER_AGENT";
pub const ENV_POST_LIMIT: &str = "REDDIT_MOOD_POST_LIMIT";
pub const ENV_COMMENT_LIMIT: &str = "REDDIT_MOOD_COMMENT_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "REDDIT_MOOD_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub user_agent: String,
    pub api_base_url: String,
    pub auth_base_url: String,
    pub post_limit: usize,
    pub comment_limit: usize,
    pub http_timeout_secs: u64,
    /// Wall-clock budget for one whole search, if any.
    pub search_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reddit_client_id: None,
            reddit_client_secret: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            post_limit: DEFAULT_POST_LIMIT,
            comment_limit: DEFAULT_COMMENT_LIMIT,
            http_timeout_secs: 30,
            search_timeout_secs: None,
        }
    }
}

/// Client credentials for Reddit's application-only OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl AppConfig {
    /// Load an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Blank values are treated as unset.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(client_id) = var(ENV_CLIENT_ID) {
            self.reddit_client_id = Some(client_id);
        }
        if let Some(client_secret) = var(ENV_CLIENT_SECRET) {
            self.reddit_client_secret = Some(client_secret);
        }
        if let Some(user_agent) = var(ENV_USER_AGENT) {
            self.user_agent = user_agent;
        }
        if let Some(value) = var(ENV_POST_LIMIT) {
            self.post_limit = parse_number(ENV_POST_LIMIT, &value)?;
        }
        if let Some(value) = var(ENV_COMMENT_LIMIT) {
            self.comment_limit = parse_number(ENV_COMMENT_LIMIT, &value)?;
        }
        if let Some(value) = var(ENV_TIMEOUT_SECS) {
            self.search_timeout_secs = Some(parse_number(ENV_TIMEOUT_SECS, &value)?);
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("post_limit", self.post_limit),
            ("comment_limit", self.comment_limit),
        ] {
            if value == 0 || value > MAX_LISTING_LIMIT {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }

        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("auth_base_url", &self.auth_base_url),
        ] {
            Url::parse(value).map_err(|_| ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.clone(),
            })?;
        }

        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Credentials needed to initialise the collector, or the first missing
    /// variable.
    pub fn reddit_credentials(&self) -> Result<RedditCredentials, ConfigError> {
        let client_id = self.reddit_client_id.clone().ok_or_else(|| {
            ConfigError::MissingEnvironmentVariable {
                var_name: ENV_CLIENT_ID.to_string(),
            }
        })?;
        let client_secret = self.reddit_client_secret.clone().ok_or_else(|| {
            ConfigError::MissingEnvironmentVariable {
                var_name: ENV_CLIENT_SECRET.to_string(),
            }
        })?;

        Ok(RedditCredentials {
            client_id,
            client_secret,
            user_agent: self.user_agent.clone(),
        })
    }

    pub fn corpus_limits(&self) -> CorpusLimits {
        CorpusLimits {
            post_limit: self.post_limit,
            comment_limit: self.comment_limit,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        })
}
