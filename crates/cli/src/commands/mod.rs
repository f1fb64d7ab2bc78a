pub mod catalog;
pub mod config;
pub mod price;
pub mod quote;

use std::fs;
use std::path::Path;

use anyhow::Context;
use sashquote_core::{Catalog, CatalogSnapshot};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(output: impl Into<String>, exit_code: u8) -> Self {
        Self { exit_code, output: output.into() }
    }
}

/// Load and deserialize a catalog snapshot, dropping inactive records.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read catalog snapshot `{}`", path.display()))?;
    let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse catalog snapshot `{}`", path.display()))?;
    let catalog = Catalog::from_snapshot(snapshot);
    tracing::info!(
        products = catalog.products().len(),
        price_groups = catalog.price_groups().len(),
        fabrics = catalog.fabrics().len(),
        extras = catalog.extras().len(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn serialize_payload<T: serde::Serialize>(payload: &T) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|error| {
        format!(
            "{{\"status\":\"error\",\"message\":\"serialization failed: {}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
