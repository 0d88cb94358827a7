//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Settings shared by every call a client makes.
///
/// Set once before the client is shared across tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address relative paths are resolved against.
    pub base_url: Option<String>,
    /// Whole-exchange timeout in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Headers attached to every request built by the client.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("rest-core/", env!("CARGO_PKG_VERSION")).to_string(),
            default_headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `REST_BASE_URL`, `REST_TIMEOUT_SECS` and
    /// `REST_USER_AGENT` when set. Unparsable timeouts are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("REST_BASE_URL") {
            config.base_url = Some(url);
        }
        if let Some(secs) = lookup("REST_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()) {
            config.timeout_secs = secs;
        }
        if let Some(agent) = lookup("REST_USER_AGENT") {
            config.user_agent = agent;
        }
        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
