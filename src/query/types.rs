//! Query types and the client trait

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A query document plus its variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Query document
    #[serde(rename = "query")]
    pub document: String,
    /// Query variables
    #[serde(default)]
    pub variables: JsonObject,
}

impl QueryRequest {
    /// Create a request without variables
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            variables: JsonObject::new(),
        }
    }

    /// Replace all variables
    #[must_use]
    pub fn with_variables(mut self, variables: JsonObject) -> Self {
        self.variables = variables;
        self
    }

    /// Set a single variable
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Read a variable
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }
}

/// Executes queries against a paged data source
///
/// Implementations must not hold controller state; each call is independent
/// and may run concurrently with others.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Execute a query and return its `data` payload
    async fn execute(&self, request: &QueryRequest) -> Result<JsonValue>;
}

/// An error entry of a GraphQL response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Error message
    pub message: String,
    /// Response path the error applies to
    #[serde(default)]
    pub path: Option<Vec<JsonValue>>,
}

/// GraphQL response envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    /// Result payload
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// Errors raised while executing
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Unwrap the payload, failing when the server returned none
    ///
    /// A partial payload alongside errors is kept; the errors are logged.
    pub fn into_data(self) -> Result<JsonValue> {
        match self.data {
            Some(data) if !data.is_null() => {
                if !self.errors.is_empty() {
                    warn!(
                        "Query returned partial data with {} error(s): {}",
                        self.errors.len(),
                        join_messages(&self.errors)
                    );
                }
                Ok(data)
            }
            _ if !self.errors.is_empty() => Err(Error::query(join_messages(&self.errors))),
            _ => Err(Error::query("response carried no data")),
        }
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
