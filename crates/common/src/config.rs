//! Client configuration and its one-shot resolution from explicit values and
//! the environment.

use serde::{Deserialize, Serialize};

/// Production trade API base URL.
pub const PROD_BASE_URL: &str = "https://api.elections.kalshi.com/trade-api/v2";

/// Demo trade API base URL.
pub const DEMO_BASE_URL: &str = "https://demo-api.kalshi.co/trade-api/v2";

/// Environment variable holding the API key identifier.
pub const ENV_API_KEY: &str = "KALSHI_API_KEY";

/// Environment variable holding the PEM-encoded RSA private key text.
pub const ENV_PRIVATE_KEY: &str = "KALSHI_PRIVATE_KEY";

/// Environment variable overriding the REST base URL.
pub const ENV_BASE_URL: &str = "KALSHI_API_BASE_URL";

/// Explicitly supplied settings. Anything left as `None` falls back to the
/// environment, then to the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub api_key: Option<String>,

    /// RSA private key PEM (literal `\n` escapes are accepted).
    #[serde(default)]
    pub private_key_pem: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    /// Use the demo environment. Takes priority over any base URL override.
    #[serde(default)]
    pub demo: bool,
}

/// Resolved, immutable client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub private_key_pem: Option<String>,
    pub base_url: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field(
                "private_key_pem",
                &self.private_key_pem.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for ClientConfig {
    /// Unauthenticated production configuration.
    fn default() -> Self {
        Self {
            api_key: None,
            private_key_pem: None,
            base_url: PROD_BASE_URL.to_string(),
        }
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ClientConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup.
    ///
    /// Credentials: explicit value > environment variable > absent.
    /// Base URL: `demo` flag > explicit override > `KALSHI_API_BASE_URL` > production.
    pub fn resolve_with<F>(overrides: ConfigOverrides, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(overrides.api_key).or_else(|| non_empty(env(ENV_API_KEY)));
        let private_key_pem =
            non_empty(overrides.private_key_pem).or_else(|| non_empty(env(ENV_PRIVATE_KEY)));

        let base_url = if overrides.demo {
            DEMO_BASE_URL.to_string()
        } else {
            non_empty(overrides.base_url)
                .or_else(|| non_empty(env(ENV_BASE_URL)))
                .map(|raw| normalize_base_url(&raw))
                .unwrap_or_else(|| PROD_BASE_URL.to_string())
        };

        Self {
            api_key,
            private_key_pem,
            base_url,
        }
    }

    /// Whether both credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.private_key_pem.is_some()
    }
}
