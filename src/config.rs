//! Router configuration

use crate::codec::DEFAULT_MAX_SUBSTRING_LEN;
use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use url::Url;

/// Public origin of the site.
pub const DEFAULT_ORIGIN: &str = "https://when-is-it.at";

/// Settings for the router and its codec.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use gpui_eventlink::RouterConfig;
///
/// let config = RouterConfig::from_json(r#"{ "history_limit": 20 }"#).unwrap();
/// assert_eq!(config.history_limit, 20);
/// assert_eq!(config.origin, "https://when-is-it.at");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Site origin. Links on this origin are handled in-app and canonical
    /// URLs are built from it.
    pub origin: String,
    /// Maximum session history entries (0 = unlimited)
    pub history_limit: usize,
    /// Longest substring the codec tries to replace
    pub max_substring_len: usize,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document and check the origin.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.origin_url()?;
        Ok(config)
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn max_substring_len(mut self, len: usize) -> Self {
        self.max_substring_len = len;
        self
    }

    /// The origin as a parsed URL.
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|source| ConfigError::Origin {
            origin: self.origin.clone(),
            source,
        })
    }

    /// The origin without a trailing slash, ready for appending a path.
    pub fn origin_prefix(&self) -> &str {
        self.origin.trim_end_matches('/')
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_substring_len: DEFAULT_MAX_SUBSTRING_LEN,
        }
    }
}
