//! Extractor trait and implementations

use crate::pagination::{PaginationItems, PaginatorInfo};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::warn;

/// Maps a raw payload to a page
///
/// Must be pure. Returning `None` means the payload carried no usable page,
/// which the controller applies as an empty page.
pub trait Extractor<TData, TModel>: Send + Sync {
    /// Extract a page from a payload
    fn extract(&self, data: TData) -> Option<PaginationItems<TModel>>;
}

impl<TData, TModel, F> Extractor<TData, TModel> for F
where
    F: Fn(TData) -> Option<PaginationItems<TModel>> + Send + Sync,
{
    fn extract(&self, data: TData) -> Option<PaginationItems<TModel>> {
        self(data)
    }
}

/// Reads `{ data, paginatorInfo }` under a dotted path of a JSON payload
///
/// For the path `posts`, items come from `$.posts.data` and metadata from
/// `$.posts.paginatorInfo`.
pub struct JsonPathExtractor<TModel> {
    path: String,
    data_field: String,
    info_field: String,
    _model: PhantomData<fn() -> TModel>,
}

impl<TModel> JsonPathExtractor<TModel> {
    /// Create an extractor for a path (e.g., "posts" or "$.user.posts")
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data_field: "data".to_string(),
            info_field: "paginatorInfo".to_string(),
            _model: PhantomData,
        }
    }

    /// Override the items field name
    #[must_use]
    pub fn with_data_field(mut self, field: impl Into<String>) -> Self {
        self.data_field = field.into();
        self
    }

    /// Override the paginator info field name
    #[must_use]
    pub fn with_info_field(mut self, field: impl Into<String>) -> Self {
        self.info_field = field.into();
        self
    }

    /// Path the page is read from
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<TModel> std::fmt::Debug for JsonPathExtractor<TModel> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonPathExtractor")
            .field("path", &self.path)
            .field("data_field", &self.data_field)
            .field("info_field", &self.info_field)
            .finish()
    }
}

impl<TModel> Extractor<JsonValue, TModel> for JsonPathExtractor<TModel>
where
    TModel: DeserializeOwned,
{
    fn extract(&self, data: JsonValue) -> Option<PaginationItems<TModel>> {
        let page = extract_path(&data, &self.path)?;
        if !page.is_object() {
            return None;
        }

        let items = match page.get(&self.data_field) {
            Some(JsonValue::Null) | None => Vec::new(),
            Some(raw) => match serde_json::from_value::<Vec<TModel>>(raw.clone()) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Failed to decode items at '{}': {}", self.path, e);
                    return None;
                }
            },
        };

        let paginator_info = match page.get(&self.info_field) {
            Some(JsonValue::Null) | None => None,
            Some(raw) => match serde_json::from_value::<PaginatorInfo>(raw.clone()) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!("Failed to decode paginator info at '{}': {}", self.path, e);
                    None
                }
            },
        };

        Some(PaginationItems {
            data: items,
            paginator_info,
        })
    }
}

/// Resolve a dotted path (optionally prefixed with `$.`) in a JSON value
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            JsonValue::Array(arr) => {
                let index: usize = part.parse().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }

    Some(current)
}
