//! Configuration Module
//!
//! Validated, immutable client settings built through [`ClientConfigBuilder`]
//! or loaded from environment variables.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::cache::{ApiCache, LruApiCache, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_ENTRIES};
use crate::error::{ConfigurationError, Result};

static SEM_VER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)$").expect("semver pattern is valid")
});

/// Client configuration.
///
/// Only obtainable through [`ClientConfig::builder`] or [`ClientConfig::from_env`],
/// so every instance holds a non-blank API key and a valid semantic version.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    user_id: String,
    sem_ver: Option<String>,
    params: HashMap<String, Value>,
    cache_ttl_seconds: u64,
    serialized: bool,
    cache: Arc<dyn ApiCache>,
}

impl ClientConfig {
    /// Starts a new builder with every field at its default.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Creates a ClientConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `JOYSTICK_API_KEY` - API key (required)
    /// - `JOYSTICK_USER_ID` - User id used for AB segmentation (default: "")
    /// - `JOYSTICK_SEM_VER` - Application semantic version (optional)
    /// - `JOYSTICK_CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `JOYSTICK_SERIALIZED` - Request serialized content by default (default: false)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(api_key) = lookup("JOYSTICK_API_KEY") {
            builder = builder.api_key(api_key);
        }
        if let Some(user_id) = lookup("JOYSTICK_USER_ID") {
            builder = builder.user_id(user_id);
        }
        if let Some(sem_ver) = lookup("JOYSTICK_SEM_VER").filter(|v| !v.is_empty()) {
            builder = builder.sem_ver(sem_ver);
        }
        if let Some(raw) = lookup("JOYSTICK_CACHE_TTL") {
            let ttl = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigurationError::InvalidEnvValue {
                    name: "JOYSTICK_CACHE_TTL",
                    value: raw.clone(),
                })?;
            builder = builder.cache_ttl_seconds(ttl);
        }
        if let Some(raw) = lookup("JOYSTICK_SERIALIZED") {
            let serialized = raw
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigurationError::InvalidEnvValue {
                    name: "JOYSTICK_SERIALIZED",
                    value: raw.clone(),
                })?;
            builder = builder.serialized(serialized);
        }
        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn sem_ver(&self) -> Option<&str> {
        self.sem_ver.as_deref()
    }

    /// Segmentation attributes sent with every read request.
    pub fn params(&self) -> &HashMap<String, Value> {
        &self.params
    }

    pub fn cache_ttl_seconds(&self) -> u64 {
        self.cache_ttl_seconds
    }

    /// Whether reads request serialized content when the call does not say.
    pub fn serialized(&self) -> bool {
        self.serialized
    }

    pub fn cache(&self) -> &Arc<dyn ApiCache> {
        &self.cache
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("sem_ver", &self.sem_ver)
            .field("params", &self.params)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("serialized", &self.serialized)
            .finish_non_exhaustive()
    }
}

// == Builder ==
/// Collects settings and validates them all in [`ClientConfigBuilder::build`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    user_id: Option<String>,
    sem_ver: Option<String>,
    params: HashMap<String, Value>,
    cache_ttl_seconds: Option<i64>,
    serialized: bool,
    cache: Option<Arc<dyn ApiCache>>,
}

impl ClientConfigBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn sem_ver(mut self, sem_ver: impl Into<String>) -> Self {
        self.sem_ver = Some(sem_ver.into());
        self
    }

    /// Replaces all segmentation params.
    pub fn params(mut self, params: HashMap<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Adds or overwrites one segmentation param.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn cache_ttl_seconds(mut self, seconds: i64) -> Self {
        self.cache_ttl_seconds = Some(seconds);
        self
    }

    pub fn serialized(mut self, serialized: bool) -> Self {
        self.serialized = serialized;
        self
    }

    /// Replaces the default in-process cache.
    pub fn cache(mut self, cache: Arc<dyn ApiCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Validates the collected settings and builds the configuration.
    ///
    /// # Errors
    /// - [`ConfigurationError::MissingApiKey`] for a missing or blank API key
    /// - [`ConfigurationError::InvalidSemVer`] when the version is not `MAJOR.MINOR.PATCH`
    /// - [`ConfigurationError::InvalidCacheTtl`] for a negative TTL
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigurationError::MissingApiKey)?;

        if let Some(version) = &self.sem_ver {
            if !SEM_VER_PATTERN.is_match(version) {
                return Err(ConfigurationError::InvalidSemVer(version.clone()).into());
            }
        }

        let ttl = self.cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS as i64);
        let cache_ttl_seconds =
            u64::try_from(ttl).map_err(|_| ConfigurationError::InvalidCacheTtl(ttl))?;

        let cache = self.cache.unwrap_or_else(|| {
            Arc::new(LruApiCache::new(DEFAULT_MAX_ENTRIES, cache_ttl_seconds))
        });

        Ok(ClientConfig {
            api_key,
            user_id: self.user_id.unwrap_or_default(),
            sem_ver: self.sem_ver,
            params: self.params,
            cache_ttl_seconds,
            serialized: self.serialized,
            cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JoystickError;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::builder().api_key("key").build().unwrap();
        assert_eq!(config.api_key(), "key");
        assert_eq!(config.user_id(), "");
        assert!(config.sem_ver().is_none());
        assert!(config.params().is_empty());
        assert_eq!(config.cache_ttl_seconds(), DEFAULT_CACHE_TTL_SECS);
        assert!(!config.serialized());
    }

    #[test]
    fn test_missing_api_key() {
        let err = ClientConfig::builder().build().unwrap_err();
        assert!(matches!(
            err,
            JoystickError::Configuration(ConfigurationError::MissingApiKey)
        ));
        assert_eq!(err.to_string(), "API key is not provided.");
    }

    #[test]
    fn test_blank_api_key() {
        for key in ["", "   ", "\t\n"] {
            let err = ClientConfig::builder().api_key(key).build().unwrap_err();
            assert_eq!(err.to_string(), "API key is not provided.");
        }
    }

    #[test]
    fn test_api_key_is_trimmed() {
        let config = ClientConfig::builder().api_key("  key ").build().unwrap();
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn test_invalid_sem_ver() {
        for version in ["0.1", "01.0.0", "1.0.0-beta", "v1.0.0", ""] {
            let err = ClientConfig::builder()
                .api_key("key")
                .sem_ver(version)
                .build()
                .unwrap_err();
            assert!(
                matches!(&err, JoystickError::Configuration(ConfigurationError::InvalidSemVer(v)) if v == version)
            );
            assert!(err.to_string().contains(&format!("[{}]", version)));
        }
    }

    #[test]
    fn test_valid_sem_ver() {
        for version in ["0.0.0", "1.2.3", "10.20.30"] {
            let config = ClientConfig::builder()
                .api_key("key")
                .sem_ver(version)
                .build()
                .unwrap();
            assert_eq!(config.sem_ver(), Some(version));
        }
    }

    #[test]
    fn test_cache_ttl_validation() {
        let err = ClientConfig::builder()
            .api_key("key")
            .cache_ttl_seconds(-1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            JoystickError::Configuration(ConfigurationError::InvalidCacheTtl(-1))
        ));

        let config = ClientConfig::builder()
            .api_key("key")
            .cache_ttl_seconds(0)
            .build()
            .unwrap();
        assert_eq!(config.cache_ttl_seconds(), 0);
    }

    #[test]
    fn test_params_accumulate() {
        let config = ClientConfig::builder()
            .api_key("key")
            .param("country", "DE")
            .param("level", 3)
            .build()
            .unwrap();
        assert_eq!(config.params().len(), 2);
        assert_eq!(config.params()["level"], Value::from(3));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::builder().api_key("secret").build().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_config_from_lookup() {
        let vars = [
            ("JOYSTICK_API_KEY", "env-key"),
            ("JOYSTICK_USER_ID", "user-1"),
            ("JOYSTICK_SEM_VER", "1.0.0"),
            ("JOYSTICK_CACHE_TTL", "60"),
            ("JOYSTICK_SERIALIZED", "true"),
        ];
        let config = ClientConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.api_key(), "env-key");
        assert_eq!(config.user_id(), "user-1");
        assert_eq!(config.sem_ver(), Some("1.0.0"));
        assert_eq!(config.cache_ttl_seconds(), 60);
        assert!(config.serialized());
    }

    #[test]
    fn test_config_from_lookup_requires_api_key() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(err.to_string(), "API key is not provided.");
    }

    #[test]
    fn test_config_from_lookup_bad_ttl() {
        let vars = [("JOYSTICK_API_KEY", "k"), ("JOYSTICK_CACHE_TTL", "soon")];
        let err = ClientConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(matches!(
            err,
            JoystickError::Configuration(ConfigurationError::InvalidEnvValue {
                name: "JOYSTICK_CACHE_TTL",
                ..
            })
        ));
    }
}
