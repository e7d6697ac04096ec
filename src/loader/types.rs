//! Loader types
//!
//! Declarative listing definition types for YAML parsing.

use crate::pagination::ConcurrencyPolicy;
use crate::query::{AuthConfig, HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, JsonObject, JsonValue, OptionStringExt, StringMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Listing Definition
// ============================================================================

/// Top-level listing definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListingDefinition {
    /// Listing name
    pub name: String,
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Query document
    pub document: String,
    /// Base query variables
    #[serde(default)]
    pub variables: JsonObject,
    /// Path of the paginated field in the response payload
    pub items_path: String,
    /// Location template for a page (e.g., "/posts?page={{ page }}")
    #[serde(default = "default_page_url")]
    pub page_url: String,
    /// Query variable carrying the page number
    #[serde(default = "default_page_variable")]
    pub page_variable: String,
    /// Publish locations after navigation
    #[serde(default = "default_true")]
    pub navigate_on_page_ops: bool,
    /// Ordering of concurrent navigations
    #[serde(default)]
    pub concurrency: ConcurrencyPolicy,
    /// Authentication configuration
    #[serde(default)]
    pub auth: Option<AuthDefinition>,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Global headers
    #[serde(default)]
    pub headers: StringMap,
}

fn default_page_url() -> String {
    "?page={{ page }}".to_string()
}

fn default_page_variable() -> String {
    "page".to_string()
}

fn default_true() -> bool {
    true
}

impl ListingDefinition {
    /// Base variables as a JSON value (template context for locations)
    pub fn variables_value(&self) -> JsonValue {
        JsonValue::Object(self.variables.clone())
    }

    /// Build the query client configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .endpoint(self.endpoint.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );

        builder = match self.http.rate_limit_rps {
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
            None => builder.no_rate_limit(),
        };

        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }

        if let Some(agent) = self.http.user_agent.clone().none_if_empty() {
            builder = builder.user_agent(agent);
        }

        if let Some(auth) = &self.auth {
            builder = builder.auth(auth.to_config());
        }

        builder.build()
    }
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthDefinition {
    /// Bearer token authentication
    #[serde(rename = "bearer")]
    Bearer {
        /// Token value
        token: String,
    },
    /// Basic authentication
    #[serde(rename = "basic")]
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// API key in a header
    #[serde(rename = "api_key")]
    ApiKey {
        /// Header name
        header: String,
        /// Value
        value: String,
        /// Optional prefix before the value
        #[serde(default)]
        prefix: Option<String>,
    },
}

impl AuthDefinition {
    /// Convert to runtime auth configuration
    pub fn to_config(&self) -> AuthConfig {
        match self {
            AuthDefinition::Bearer { token } => AuthConfig::bearer(token.clone()),
            AuthDefinition::Basic { username, password } => {
                AuthConfig::basic(username.clone(), password.clone())
            }
            AuthDefinition::ApiKey {
                header,
                value,
                prefix,
            } => AuthConfig::ApiKey {
                header_name: header.clone(),
                prefix: prefix.clone(),
                value: value.clone(),
            },
        }
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,
    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            rate_limit_rps: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    60_000
}
