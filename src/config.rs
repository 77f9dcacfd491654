use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ConfigError;

/// Environment variable that overrides `lookup.api_key`.
pub const API_KEY_ENV: &str = "INGREDIENT_CHECKR_API_KEY";

/// Public skindeep search page, queried in [`LookupMode::Direct`].
pub const DIRECT_SEARCH_URL: &str = "https://www.ewg.org/skindeep/search/";

/// Root configuration structure, deserialized from `.ingredient-checkr/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Safety-data lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// How and where ingredient safety data is fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Whether to call the JSON proxy or the search page directly.
    /// Unset means proxy when `endpoint` is given, direct otherwise.
    #[serde(default)]
    pub mode: Option<LookupMode>,
    /// Proxy endpoint (proxy mode) or search page URL (direct mode).
    /// Direct mode falls back to [`DIRECT_SEARCH_URL`].
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token sent to the proxy.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout. Defaults to 10 seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum lookups in flight at once. Defaults to 8.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Transport-level retry for failed sends and 5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Extra attempts after the first one. Defaults to 2.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between attempts. Defaults to 1000 ms.
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

/// Which flavour of the safety-data service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// JSON envelope `{ "html": ... }` / `{ "error": ... }` behind bearer auth.
    Proxy,
    /// Raw search-page HTML.
    Direct,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    8
}

fn default_user_agent() -> String {
    format!("ingredient-checkr/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            mode: None,
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: default_max_retries(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured mode, or proxy when only an endpoint is given.
    pub fn mode(&self) -> LookupMode {
        match (self.mode, &self.endpoint) {
            (Some(mode), _) => mode,
            (None, Some(_)) => LookupMode::Proxy,
            (None, None) => LookupMode::Direct,
        }
    }

    /// Endpoint the resolver should hit for the configured mode.
    pub fn effective_endpoint(&self) -> Option<&str> {
        match (self.mode(), self.endpoint.as_deref()) {
            (_, Some(endpoint)) => Some(endpoint),
            (LookupMode::Direct, None) => Some(DIRECT_SEARCH_URL),
            (LookupMode::Proxy, None) => None,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    /// Reject settings the pipeline cannot run with, online or offline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "lookup.concurrency must be at least 1".to_string(),
            ));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "lookup.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// [`Config::validate`], plus the checks that only matter when lookups
    /// actually go over the network.
    pub fn validate_online(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.lookup.effective_endpoint().is_none() {
            return Err(ConfigError::Invalid(
                "lookup.endpoint is required in proxy mode".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.ingredient-checkr/config.toml`
/// 3. `~/.config/ingredient-checkr/config.toml`
/// 4. Built-in [`Config::default`]
///
/// [`API_KEY_ENV`] then overrides the API key, and the result is checked with
/// [`Config::validate`]. Callers about to go online also need
/// [`Config::validate_online`].
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = find_config(project_path, config_override)?;

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.lookup.api_key = Some(key);
        }
    }

    config.validate()?;
    Ok(config)
}

fn find_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".ingredient-checkr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("ingredient-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
