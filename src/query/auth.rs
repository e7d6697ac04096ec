//! Request authentication
//!
//! Static credentials applied to every query request.

use reqwest::RequestBuilder;

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// API key in a header
    ApiKey {
        /// Header name
        header_name: String,
        /// Prefix to add before the value (e.g., "Token ")
        prefix: Option<String>,
        /// The API key value
        value: String,
    },
}

impl AuthConfig {
    /// Create bearer auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Create basic auth
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create header API key auth
    pub fn api_key(header_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            header_name: header_name.into(),
            prefix: None,
            value: value.into(),
        }
    }

    /// Check if any credentials are configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            AuthConfig::None => req,
            AuthConfig::Bearer { token } => req.bearer_auth(token),
            AuthConfig::Basic { username, password } => req.basic_auth(username, Some(password)),
            AuthConfig::ApiKey {
                header_name,
                prefix,
                value,
            } => {
                let val = format!("{}{}", prefix.as_deref().unwrap_or(""), value);
                req.header(header_name.as_str(), val)
            }
        }
    }
}
