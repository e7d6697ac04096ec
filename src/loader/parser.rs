//! YAML parser for listing definitions
//!
//! Parses and validates listing YAML files.

use crate::error::{Error, Result};
use crate::loader::types::ListingDefinition;
use crate::template;
use std::fs;
use std::path::Path;
use url::Url;

/// Load a listing definition from a file path
pub fn load_listing(path: impl AsRef<Path>) -> Result<ListingDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read listing file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_listing_from_str(&content)
}

/// Load a listing definition from a YAML string
pub fn load_listing_from_str(yaml: &str) -> Result<ListingDefinition> {
    let def: ListingDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse listing YAML: {e}")))?;

    validate_listing(&def)?;
    Ok(def)
}

/// Validate a listing definition
fn validate_listing(def: &ListingDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Listing name cannot be empty"));
    }

    if def.endpoint.is_empty() {
        return Err(Error::config("Listing endpoint cannot be empty"));
    }
    let endpoint = Url::parse(&def.endpoint)?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "Listing endpoint must be http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    if def.document.trim().is_empty() {
        return Err(Error::config("Listing document cannot be empty"));
    }

    if def.items_path.is_empty() {
        return Err(Error::config("Listing items_path cannot be empty"));
    }

    if def.page_variable.is_empty() {
        return Err(Error::config("Listing page_variable cannot be empty"));
    }

    // Every location placeholder must resolve
    template::render_page_url(&def.page_url, 1, &def.variables_value())
        .map_err(|e| Error::config(format!("Invalid page_url '{}': {}", def.page_url, e)))?;

    Ok(())
}
