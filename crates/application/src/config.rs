//! Environment-provided configuration.
//!
//! Service locations and API keys come from `APIPROBE_*` environment
//! variables instead of literals in the tests. Keys that a test group needs
//! are checked with [`ProbeConfig::require`] before any request is sent.

use std::fmt;

use thiserror::Error;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "APIPROBE_";

const DEFAULT_ZIPPO_BASE_URI: &str = "http://api.zippopotam.us";
const DEFAULT_GOREST_BASE_URI: &str = "https://gorest.co.in/public/v1";
const DEFAULT_WEATHER_BASE_URI: &str = "http://api.weatherapi.com/v1";
const DEFAULT_WEATHER_LOCATION: &str = "Lyndhurst";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(String),

    /// A variable is set but cannot be used.
    #[error("invalid value for {var}: {message}")]
    Invalid {
        /// Variable name.
        var: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// Configuration values that can be required by a test group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Base URI of the zip-code lookup API.
    ZippoBaseUri,
    /// Base URI of the user-listing API.
    GorestBaseUri,
    /// Base URI of the weather API.
    WeatherBaseUri,
    /// Location queried on the weather API.
    WeatherLocation,
    /// API key for the weather API.
    WeatherApiKey,
    /// URL of the API-key gated user endpoint.
    UserApiUri,
    /// API key sent in `x-api-key` to the user endpoint.
    UserApiKey,
}

impl ConfigKey {
    /// Returns the full environment variable name.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::ZippoBaseUri => "APIPROBE_ZIPPO_BASE_URI",
            Self::GorestBaseUri => "APIPROBE_GOREST_BASE_URI",
            Self::WeatherBaseUri => "APIPROBE_WEATHER_BASE_URI",
            Self::WeatherLocation => "APIPROBE_WEATHER_LOCATION",
            Self::WeatherApiKey => "APIPROBE_WEATHER_API_KEY",
            Self::UserApiUri => "APIPROBE_USER_API_URI",
            Self::UserApiKey => "APIPROBE_USER_API_KEY",
        }
    }
}

/// A secret value whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Base URI of the zip-code lookup API.
    pub zippo_base_uri: String,
    /// Base URI of the user-listing API.
    pub gorest_base_uri: String,
    /// Base URI of the weather API.
    pub weather_base_uri: String,
    /// Location queried on the weather API.
    pub weather_location: String,
    /// API key for the weather API.
    pub weather_api_key: Option<Secret>,
    /// URL of the API-key gated user endpoint.
    pub user_api_uri: Option<String>,
    /// API key for the user endpoint.
    pub user_api_key: Option<Secret>,
    /// Optional request timeout; the transport default applies when unset.
    pub timeout_ms: Option<u64>,
}

impl ProbeConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a set variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through a lookup function.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a set variable is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let key = |key: ConfigKey| get(key.env_var());

        let timeout_var = format!("{ENV_PREFIX}TIMEOUT_MS");
        let timeout_ms = get(&timeout_var)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: timeout_var.clone(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        let config = Self {
            zippo_base_uri: key(ConfigKey::ZippoBaseUri)
                .unwrap_or_else(|| DEFAULT_ZIPPO_BASE_URI.to_string()),
            gorest_base_uri: key(ConfigKey::GorestBaseUri)
                .unwrap_or_else(|| DEFAULT_GOREST_BASE_URI.to_string()),
            weather_base_uri: key(ConfigKey::WeatherBaseUri)
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URI.to_string()),
            weather_location: key(ConfigKey::WeatherLocation)
                .unwrap_or_else(|| DEFAULT_WEATHER_LOCATION.to_string()),
            weather_api_key: key(ConfigKey::WeatherApiKey).map(Secret::new),
            user_api_uri: key(ConfigKey::UserApiUri),
            user_api_key: key(ConfigKey::UserApiKey).map(Secret::new),
            timeout_ms,
        };

        for (var, uri) in [
            (ConfigKey::ZippoBaseUri, Some(&config.zippo_base_uri)),
            (ConfigKey::GorestBaseUri, Some(&config.gorest_base_uri)),
            (ConfigKey::WeatherBaseUri, Some(&config.weather_base_uri)),
            (ConfigKey::UserApiUri, config.user_api_uri.as_ref()),
        ] {
            if let Some(uri) = uri {
                validate_http_uri(var, uri)?;
            }
        }

        Ok(config)
    }

    /// Returns the value for `key`, failing if it is not configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the environment variable.
    pub fn require(&self, key: ConfigKey) -> Result<&str, ConfigError> {
        let value = match key {
            ConfigKey::ZippoBaseUri => Some(self.zippo_base_uri.as_str()),
            ConfigKey::GorestBaseUri => Some(self.gorest_base_uri.as_str()),
            ConfigKey::WeatherBaseUri => Some(self.weather_base_uri.as_str()),
            ConfigKey::WeatherLocation => Some(self.weather_location.as_str()),
            ConfigKey::WeatherApiKey => self.weather_api_key.as_ref().map(Secret::expose),
            ConfigKey::UserApiUri => self.user_api_uri.as_deref(),
            ConfigKey::UserApiKey => self.user_api_key.as_ref().map(Secret::expose),
        };
        value.ok_or_else(|| ConfigError::Missing(key.env_var().to_string()))
    }

    /// Checks that every key in `keys` is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for the first absent key.
    pub fn require_all(&self, keys: &[ConfigKey]) -> Result<(), ConfigError> {
        keys.iter().try_for_each(|key| self.require(*key).map(|_| ()))
    }
}

fn validate_http_uri(key: ConfigKey, uri: &str) -> Result<(), ConfigError> {
    let lower = uri.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            var: key.env_var().to_string(),
            message: format!("expected an http(s) URI, got `{uri}`"),
        })
    }
}
