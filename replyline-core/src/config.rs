use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigError;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PREFIX: &str = "REPLYLINE_";

/// Social platform an automation is attached to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Instagram
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "facebook" | "fb" => Ok(Platform::Facebook),
            other => Err(ConfigError::invalid(
                "platform",
                format!("unknown platform '{other}'"),
            )),
        }
    }
}

/// Values accepted from `~/.replyline/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    api_token: Option<String>,
    platform: Option<String>,
    platform_user_id: Option<String>,
    provider_id: Option<String>,
    request_timeout_secs: Option<u64>,
    log_level: Option<String>,
}

/// Connection and account settings used by the automation client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub api_token: Option<String>,
    pub platform: Platform,
    pub platform_user_id: Option<String>,
    pub provider_id: Option<String>,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl ClientConfig {
    /// Built-in settings pointing at the given API base URL.
    pub fn for_api(api_url: Url) -> Self {
        Self {
            api_url,
            api_token: None,
            platform: Platform::default(),
            platform_user_id: None,
            provider_id: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: "info".to_string(),
        }
    }

    /// Built-in defaults, before any file or environment layer.
    pub fn defaults() -> Result<Self, ConfigError> {
        Ok(Self::for_api(parse_api_url("api_url", DEFAULT_API_URL)?))
    }

    /// Loads defaults, then the user config file, then `REPLYLINE_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_prefix(DEFAULT_PREFIX)
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable prefix (e.g. `STAGING_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::defaults()?;
        if let Some(path) = default_config_path() {
            if path.exists() {
                config.merge_file(&path)?;
            }
        }
        config.merge_env(prefix, |key| env::var(key).ok())?;
        Ok(config)
    }

    /// Applies values from a TOML file on top of the current settings.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::File {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|err| ConfigError::File {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        if let Some(url) = file.api_url {
            self.api_url = parse_api_url("api_url", &url)?;
        }
        if let Some(token) = file.api_token {
            self.api_token = non_empty(token);
        }
        if let Some(platform) = file.platform {
            self.platform = platform.parse()?;
        }
        if let Some(id) = file.platform_user_id {
            self.platform_user_id = non_empty(id);
        }
        if let Some(id) = file.provider_id {
            self.provider_id = non_empty(id);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        Ok(())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn merge_env<F>(&mut self, prefix: &str, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let url_key = key("API_URL");
        if let Some(raw) = lookup(&url_key) {
            self.api_url = parse_api_url(&url_key, &raw)?;
        }
        if let Some(token) = lookup(&key("API_TOKEN")) {
            self.api_token = non_empty(token);
        }
        if let Some(raw) = lookup(&key("PLATFORM")) {
            self.platform = raw.parse()?;
        }
        if let Some(id) = lookup(&key("PLATFORM_USER_ID")) {
            self.platform_user_id = non_empty(id);
        }
        if let Some(id) = lookup(&key("PROVIDER_ID")) {
            self.provider_id = non_empty(id);
        }
        let timeout_key = key("TIMEOUT_SECS");
        if let Some(raw) = lookup(&timeout_key) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|err| ConfigError::invalid(&timeout_key, err.to_string()))?;
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(level) = lookup(&key("LOG")) {
            self.log_level = level;
        }
        Ok(())
    }

    /// Replaces the API base URL, e.g. from a command-line flag.
    pub fn set_api_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.api_url = parse_api_url("api_url", raw)?;
        Ok(())
    }

    /// Returns the platform user id or an error naming the variable to set.
    pub fn require_platform_user_id(&self) -> Result<&str, ConfigError> {
        self.platform_user_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(format!("{DEFAULT_PREFIX}PLATFORM_USER_ID")))
    }

    /// Returns the provider id or an error naming the variable to set.
    pub fn require_provider_id(&self) -> Result<&str, ConfigError> {
        self.provider_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(format!("{DEFAULT_PREFIX}PROVIDER_ID")))
    }
}

/// `~/.replyline/config.toml`, when a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".replyline").join("config.toml"))
}

fn parse_api_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|err| ConfigError::invalid(key, err.to_string()))?;
    // Url::join drops the last path segment unless the base ends with '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path().trim_end_matches('/'));
        url.set_path(&path);
    }
    Ok(url)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
