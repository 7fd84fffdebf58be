//! Client configuration.
//!
//! [`ClientConfig`] holds what a [`HalClient`](crate::HalClient) needs to be
//! built; [`ConfigLoader`] assembles one from layered sources, later layers
//! overriding earlier ones:
//!
//! 1. default values
//! 2. a TOML or JSON file (or string)
//! 3. environment variables under a prefix
//!
//! # Environment variables
//!
//! With prefix `HALFORMS`:
//!
//! | Variable | Field |
//! |---|---|
//! | `HALFORMS__BASE_HREF` | `base_href` |
//! | `HALFORMS__TIMEOUT_SECS` | `timeout_secs` (`none` clears it) |
//! | `HALFORMS__USER_AGENT` | `user_agent` |
//! | `HALFORMS__ACCEPT` | `accepted_media_types`, comma separated |

use halforms_core::{HalError, HalResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Media type of HAL-FORMS documents.
pub const HAL_FORMS_MEDIA_TYPE: &str = "application/prs.hal-forms+json";

/// Media type of HAL documents.
pub const HAL_MEDIA_TYPE: &str = "application/hal+json";

/// Configuration of a client.
///
/// # Example
///
/// ```
/// use halforms_client::ClientConfig;
///
/// let config = ClientConfig::new("https://api.test/")
///     .with_timeout_secs(5)
///     .with_user_agent("orders-ui/1.0");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.accepted_media_types[0], "application/prs.hal-forms+json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base address relative targets are resolved against.
    pub base_href: String,
    /// Media types advertised in the default `accept` header, preferred first.
    pub accepted_media_types: Vec<String>,
    /// Overall request timeout in seconds, used by the default transport.
    pub timeout_secs: Option<u64>,
    /// User agent used by the default transport.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_href: String::new(),
            accepted_media_types: vec![
                HAL_FORMS_MEDIA_TYPE.to_string(),
                HAL_MEDIA_TYPE.to_string(),
            ],
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with defaults and the given base.
    pub fn new(base_href: impl Into<String>) -> Self {
        Self {
            base_href: base_href.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replaces the accepted media types.
    #[must_use]
    pub fn with_accepted_media_types<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_media_types = media_types.into_iter().map(Into::into).collect();
        self
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> HalResult<()> {
        if self.base_href.trim().is_empty() {
            return Err(HalError::config("base_href must not be empty"));
        }
        if self.accepted_media_types.is_empty() {
            return Err(HalError::config("accepted_media_types must not be empty"));
        }
        if let Some(empty) = self
            .accepted_media_types
            .iter()
            .position(|media_type| media_type.trim().is_empty())
        {
            return Err(HalError::config(format!(
                "accepted_media_types[{empty}] must not be empty"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(HalError::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}

/// Layered configuration loader.
///
/// # Example
///
/// ```
/// use halforms_client::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_string(r#"base_href = "https://api.test/""#, "toml")
///     .unwrap()
///     .load()
///     .unwrap();
/// assert_eq!(config.base_href, "https://api.test/");
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: ClientConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader starting from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current layer with `config`.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads a TOML (`.toml`) or JSON (`.json`) file.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> HalResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HalError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        debug!(path = %path.display(), "loading client configuration");
        self.with_string(&content, &format)
    }

    /// Loads a file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> HalResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format (`toml` or `json`).
    pub fn with_string(mut self, content: &str, format: &str) -> HalResult<Self> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)
                .map_err(|e| HalError::config(format!("invalid TOML: {e}")))?,
            "json" => serde_json::from_str(content)
                .map_err(|e| HalError::config(format!("invalid JSON: {e}")))?,
            other => {
                return Err(HalError::config(format!(
                    "unsupported configuration format: {other}"
                )))
            }
        };
        Ok(self)
    }

    /// Applies environment variables named `PREFIX__KEY` on load.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates the result.
    pub fn load(mut self) -> HalResult<ClientConfig> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_vars(&prefix, env::vars())?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    pub fn load_unvalidated(self) -> ClientConfig {
        self.config
    }

    fn apply_env_vars(
        &mut self,
        prefix: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> HalResult<()> {
        let scoped = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(field) = key.strip_prefix(&scoped) {
                self.apply_env_var(&key, field, &value)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, field: &str, value: &str) -> HalResult<()> {
        match field {
            "BASE_HREF" => self.config.base_href = value.to_string(),
            "TIMEOUT_SECS" => {
                self.config.timeout_secs = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        HalError::config(format!("{key}: expected integer or 'none'"))
                    })?)
                };
            }
            "USER_AGENT" => self.config.user_agent = Some(value.to_string()),
            "ACCEPT" => {
                self.config.accepted_media_types = value
                    .split(',')
                    .map(str::trim)
                    .filter(|media_type| !media_type.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => return Err(HalError::config(format!("{key}: unknown configuration key"))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(
            config.accepted_media_types,
            vec!["application/prs.hal-forms+json", "application/hal+json"]
        );
        assert!(config.timeout().is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new("https://api.test/").validate().is_ok());
        assert!(ClientConfig::new("  ").validate().is_err());
        assert!(ClientConfig::new("https://api.test/")
            .with_accepted_media_types(Vec::<String>::new())
            .validate()
            .is_err());
        assert!(ClientConfig::new("https://api.test/")
            .with_accepted_media_types(["application/hal+json", ""])
            .validate()
            .is_err());
        assert!(ClientConfig::new("https://api.test/")
            .with_timeout_secs(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_toml_and_json_strings() {
        let config = ConfigLoader::new()
            .with_string(
                r#"
                    base_href = "https://api.test/"
                    timeout_secs = 10
                    accepted_media_types = ["application/hal+json"]
                "#,
                "toml",
            )
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.accepted_media_types, vec!["application/hal+json"]);

        let config = ConfigLoader::new()
            .with_string(r#"{ "base_href": "https://api.test/", "user_agent": "ua" }"#, "JSON")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("ua"));
        assert_eq!(config.accepted_media_types.len(), 2);
    }

    #[test]
    fn test_invalid_sources() {
        let err = ConfigLoader::new().with_string("base_href = ", "toml").unwrap_err();
        assert!(matches!(err, HalError::Config { .. }));

        let err = ConfigLoader::new().with_string("{}", "yaml").unwrap_err();
        assert!(err.to_string().contains("unsupported configuration format"));

        let err = ConfigLoader::new()
            .with_string(r#"unknown = 1"#, "toml")
            .unwrap_err();
        assert!(matches!(err, HalError::Config { .. }));

        let err = ConfigLoader::new()
            .with_file("/definitely/not/here.toml")
            .unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_env_overrides() {
        let mut loader = ConfigLoader::new().with_config(ClientConfig::new("https://file.test/"));
        loader
            .apply_env_vars(
                "HALFORMS",
                vars(&[
                    ("HALFORMS__BASE_HREF", "https://env.test/"),
                    ("HALFORMS__TIMEOUT_SECS", "30"),
                    ("HALFORMS__ACCEPT", "application/hal+json, application/json"),
                    ("OTHER__BASE_HREF", "https://ignored.test/"),
                ]),
            )
            .unwrap();
        let config = loader.load().unwrap();
        assert_eq!(config.base_href, "https://env.test/");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(
            config.accepted_media_types,
            vec!["application/hal+json", "application/json"]
        );
    }

    #[test]
    fn test_env_errors() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_env_vars("HALFORMS", vars(&[("HALFORMS__TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("expected integer"));

        let err = loader
            .apply_env_vars("HALFORMS", vars(&[("HALFORMS__COLOUR", "blue")]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown configuration key"));

        loader
            .apply_env_vars("HALFORMS", vars(&[("HALFORMS__TIMEOUT_SECS", "none")]))
            .unwrap();
        assert!(loader.load_unvalidated().timeout_secs.is_none());
    }
}
