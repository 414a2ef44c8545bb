use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Google's JSON DoH API; any endpoint speaking `application/dns-json` works.
pub const DEFAULT_DOH_ENDPOINT: &str = "https://dns.google/resolve";

/// Knobs for the outbound MX lookups of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl ResolverOptions {
    /// Per-lookup deadline. A zero timeout disables it.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}
