//! Template interpolation for page locations and query variables
//!
//! Handles `{{ variable }}` interpolation in listing definitions.
//! `{{ page }}` is the target page; `{{ vars.name }}` reads listing variables.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Target page number
    pub page: Option<u32>,
    /// Listing variables
    pub vars: Value,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context for a page
    pub fn for_page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    /// Set listing variables
    #[must_use]
    pub fn with_vars(mut self, vars: Value) -> Self {
        self.vars = vars;
        self
    }

    /// Get a value by path (e.g., "page" or "vars.tag")
    pub fn get(&self, path: &str) -> Option<Value> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["page"] => self.page.map(Value::from),
            ["vars", rest @ ..] => get_nested_value(&self.vars, rest).cloned(),
            // Bare names fall back to listing variables
            _ => get_nested_value(&self.vars, &parts).cloned(),
        }
    }
}

/// Get a nested value from a JSON value by path
fn get_nested_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for part in path {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut errors = Vec::new();

    let result = TEMPLATE_REGEX.replace_all(template, |cap: &regex::Captures<'_>| {
        let var_path = &cap[1];
        match ctx.get(var_path) {
            Some(value) => value_to_string(&value),
            None => {
                errors.push(var_path.to_string());
                String::new()
            }
        }
    });

    if errors.is_empty() {
        Ok(result.into_owned())
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Render the shareable location of a page
pub fn render_page_url(template: &str, page: u32, vars: &Value) -> Result<String> {
    let ctx = TemplateContext::for_page(page).with_vars(vars.clone());
    render(template, &ctx)
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For complex types, use JSON serialization
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
