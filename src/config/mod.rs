//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `HAVEN_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_EMBEDDING_DIM, DEFAULT_SEMANTIC_TIMEOUT,
    MAX_SEMANTIC_TIMEOUT,
};

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `HAVEN_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file with the center directory. Default: `./data/centers.json`.
    pub centers_path: PathBuf,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding center vectors. Default: `centers`.
    pub collection: String,

    /// Base URL of an OpenAI-compatible embeddings API.
    pub embedding_url: String,

    /// Bearer token for the embeddings API.
    pub embedding_api_key: Option<String>,

    /// Embedding model name; doubles as the provider version in cache keys.
    pub embedding_model: String,

    /// Expected embedding dimension. Default: `1536`.
    pub embedding_dim: usize,

    /// Embedding cache TTL. Default: 24h.
    pub cache_ttl: Duration,

    /// Max entries in the in-process embedding cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// Budget for the whole semantic path of one request. Default: 4s.
    pub semantic_timeout: Duration,

    /// Use the deterministic stub embedding provider instead of HTTP.
    pub mock_provider: bool,
}

/// Default Qdrant URL used when `HAVEN_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default embeddings API base URL.
pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

pub const DEFAULT_COLLECTION: &str = "centers";

impl Default for Config {
    fn default() -> Self {
        Self {
            centers_path: PathBuf::from("./data/centers.json"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            semantic_timeout: DEFAULT_SEMANTIC_TIMEOUT,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_CENTERS_PATH: &'static str = "HAVEN_CENTERS_PATH";
    const ENV_QDRANT_URL: &'static str = "HAVEN_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "HAVEN_COLLECTION";
    const ENV_EMBEDDING_URL: &'static str = "HAVEN_EMBEDDING_URL";
    const ENV_EMBEDDING_API_KEY: &'static str = "HAVEN_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "HAVEN_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "HAVEN_EMBEDDING_DIM";
    const ENV_CACHE_TTL_SECS: &'static str = "HAVEN_CACHE_TTL_SECS";
    const ENV_CACHE_CAPACITY: &'static str = "HAVEN_CACHE_CAPACITY";
    const ENV_SEMANTIC_TIMEOUT_MS: &'static str = "HAVEN_SEMANTIC_TIMEOUT_MS";
    const ENV_MOCK_PROVIDER: &'static str = "HAVEN_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let centers_path = Self::parse_path_from_env(Self::ENV_CENTERS_PATH, defaults.centers_path);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let embedding_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_URL, defaults.embedding_url);
        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_dim = Self::parse_number_from_env(
            Self::ENV_EMBEDDING_DIM,
            defaults.embedding_dim as u64,
        )? as usize;
        let cache_ttl = Duration::from_secs(Self::parse_number_from_env(
            Self::ENV_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        )?);
        let cache_capacity =
            Self::parse_u64_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity);
        let semantic_timeout = Duration::from_millis(Self::parse_number_from_env(
            Self::ENV_SEMANTIC_TIMEOUT_MS,
            defaults.semantic_timeout.as_millis() as u64,
        )?);
        let mock_provider = env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty());

        Ok(Self {
            centers_path,
            qdrant_url,
            collection,
            embedding_url,
            embedding_api_key,
            embedding_model,
            embedding_dim,
            cache_ttl,
            cache_capacity,
            semantic_timeout,
            mock_provider,
        })
    }

    /// Validates ranges and URLs (does not touch the network or filesystem).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.cache_ttl.is_zero() {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_CACHE_TTL_SECS,
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.semantic_timeout.is_zero() || self.semantic_timeout > MAX_SEMANTIC_TIMEOUT {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_SEMANTIC_TIMEOUT_MS,
                reason: format!(
                    "must be between 1 and {} ms",
                    MAX_SEMANTIC_TIMEOUT.as_millis()
                ),
            });
        }

        for (name, value) in [
            (Self::ENV_QDRANT_URL, &self.qdrant_url),
            (Self::ENV_EMBEDDING_URL, &self.embedding_url),
        ] {
            if !is_http_url(value) {
                return Err(ConfigError::InvalidUrl {
                    name,
                    value: value.clone(),
                });
            }
        }

        if !self.mock_provider && self.embedding_api_key.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_EMBEDDING_API_KEY,
            });
        }

        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_number_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name,
                    value: value.clone(),
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// Accepts absolute `http`/`https` URLs that carry a host and a valid port.
fn is_http_url(value: &str) -> bool {
    // `Url::parse` folds `https:///path` into host `path`; reject empty authorities first.
    let authority = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    if !matches!(authority, Some(rest) if !rest.is_empty() && !rest.starts_with('/')) {
        return false;
    }

    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
