//! Client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which source [`SecretKeeper`](crate::SecretKeeper) consults first on reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadPolicy {
    /// Serve the cached bundle when present; fetch only on a miss.
    #[default]
    CacheFirst,
    /// Always fetch; fall back to the cached bundle when the server fails.
    ServerFirst,
}

impl FromStr for ReadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cache-first" | "cache" => Ok(ReadPolicy::CacheFirst),
            "server-first" | "server" => Ok(ReadPolicy::ServerFirst),
            other => Err(format!(
                "unknown read policy '{other}' (expected cache-first or server-first)"
            )),
        }
    }
}

impl fmt::Display for ReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReadPolicy::CacheFirst => "cache-first",
            ReadPolicy::ServerFirst => "server-first",
        })
    }
}

/// Configuration for the server client and orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server origin, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,

    /// Per-request timeout in seconds. `0` disables it.
    pub request_timeout_secs: u64,

    pub read_policy: ReadPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            read_policy: ReadPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Builds a config pointing at `http://{host}:{port}`.
    pub fn for_host(host: &str, port: u16) -> Self {
        Self {
            base_url: format!("http://{host}:{port}"),
            ..Self::default()
        }
    }

    /// Root of the user API, e.g. `http://127.0.0.1:8080/v1/api/user`.
    pub fn api_root(&self) -> String {
        format!("{}/v1/api/user", self.base_url.trim_end_matches('/'))
    }
}
