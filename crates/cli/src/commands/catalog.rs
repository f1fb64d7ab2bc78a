use std::path::PathBuf;

use clap::Args;
use sashquote_core::config::AppConfig;
use sashquote_core::PricingSpec;
use serde::Serialize;

use super::{load_catalog, serialize_payload, CommandResult};

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog snapshot to inspect, overriding the configured path
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CatalogReport {
    products: usize,
    price_groups: usize,
    fabrics: usize,
    extras: usize,
    product_summaries: Vec<ProductSummary>,
}

#[derive(Debug, Serialize)]
struct ProductSummary {
    id: String,
    name: String,
    supplier: String,
    category: String,
    pricing: &'static str,
    /// Group keys the product's grid tables can serve.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    grid_keys: Vec<String>,
}

pub fn run(config: &AppConfig, args: CatalogArgs) -> anyhow::Result<CommandResult> {
    let catalog_path = args.catalog.clone().unwrap_or_else(|| config.catalog.path.clone());
    let catalog = load_catalog(&catalog_path)?;

    let product_summaries = catalog
        .products()
        .iter()
        .map(|product| {
            let (pricing, grid_keys) = match &product.pricing {
                PricingSpec::Grid(data) => {
                    let mut keys: Vec<String> = data
                        .grids
                        .as_ref()
                        .map(|grids| grids.keys().cloned().collect())
                        .unwrap_or_default();
                    if keys.is_empty() && data.grid.is_some() {
                        keys.push("1".to_string());
                    }
                    ("grid", keys)
                }
                PricingSpec::Sqm(_) => ("sqm", Vec::new()),
                PricingSpec::Unit(_) => ("unit", Vec::new()),
                PricingSpec::Unknown => ("unknown", Vec::new()),
            };
            ProductSummary {
                id: product.id.to_string(),
                name: product.name.clone(),
                supplier: product.supplier.clone(),
                category: product.category.clone(),
                pricing,
                grid_keys,
            }
        })
        .collect();

    let report = CatalogReport {
        products: catalog.products().len(),
        price_groups: catalog.price_groups().len(),
        fabrics: catalog.fabrics().len(),
        extras: catalog.extras().len(),
        product_summaries,
    };
    Ok(CommandResult::success(serialize_payload(&report)))
}
