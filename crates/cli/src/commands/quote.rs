use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use sashquote_core::config::AppConfig;
use sashquote_core::{
    Catalog, ExtraId, FabricId, Fullness, ItemUpdate, LineItem, PriceGroupId, ProductId,
    QuoteBuilder, QuoteDraft, QuoteTotals,
};
use serde::{Deserialize, Serialize};

use super::{load_catalog, serialize_payload, CommandResult};

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Catalog snapshot to price against, overriding the configured path
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Quote request file (JSON)
    #[arg(long)]
    pub request: PathBuf,
}

/// Wire shape of a quote request file.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub customer_name: String,
    /// Overall margin; falls back to the configured default.
    #[serde(default)]
    pub overall_margin_percent: Option<Decimal>,
    #[serde(default)]
    pub category_margins: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub show_gst: Option<bool>,
    #[serde(default)]
    pub items: Vec<QuoteRequestItem>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequestItem {
    pub product_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub drop: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price_group_id: Option<String>,
    #[serde(default)]
    pub fabric_id: Option<String>,
    #[serde(default)]
    pub fullness: Option<Fullness>,
    #[serde(default)]
    pub extra_ids: Vec<String>,
    /// Per-line margin override; explicit 0 is honored.
    #[serde(default)]
    pub margin_percent: Option<Decimal>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct QuoteReport {
    pub customer_name: String,
    pub overall_margin_percent: Decimal,
    pub show_gst: bool,
    pub items: Vec<LineItem>,
    pub totals: QuoteTotals,
}

pub fn run(config: &AppConfig, args: QuoteArgs) -> anyhow::Result<CommandResult> {
    let catalog_path = args.catalog.clone().unwrap_or_else(|| config.catalog.path.clone());
    let catalog = load_catalog(&catalog_path)?;

    let raw = fs::read_to_string(&args.request)
        .with_context(|| format!("could not read quote request `{}`", args.request.display()))?;
    let request: QuoteRequest = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse quote request `{}`", args.request.display()))?;

    let report = evaluate(catalog, config, request)?;
    tracing::info!(
        items = report.items.len(),
        total_sell = %report.totals.total_sell,
        "quote evaluated"
    );
    Ok(CommandResult::success(serialize_payload(&report)))
}

/// Price every requested line and fold the totals.
pub fn evaluate(
    catalog: Catalog,
    config: &AppConfig,
    request: QuoteRequest,
) -> anyhow::Result<QuoteReport> {
    let overall = request
        .overall_margin_percent
        .unwrap_or(config.quoting.default_margin_percent);
    let mut draft = QuoteDraft::with_margin(overall);
    draft.customer_name = request.customer_name;
    draft.category_margins = request.category_margins;
    draft.show_gst = request.show_gst.unwrap_or(config.quoting.show_gst);

    let mut builder = QuoteBuilder::with_draft(catalog, draft);
    for (index, line) in request.items.into_iter().enumerate() {
        add_line(&mut builder, line)
            .with_context(|| format!("quote request item {}", index + 1))?;
    }

    let draft = builder.draft();
    Ok(QuoteReport {
        customer_name: draft.customer_name.clone(),
        overall_margin_percent: draft.overall_margin_percent,
        show_gst: draft.show_gst,
        items: draft.items.clone(),
        totals: builder.totals(),
    })
}

fn add_line(builder: &mut QuoteBuilder, line: QuoteRequestItem) -> anyhow::Result<()> {
    builder.select_product(ProductId(line.product_id))?;
    builder.select_price_group(line.price_group_id.map(PriceGroupId))?;
    builder.select_fabric(line.fabric_id.map(FabricId))?;
    for extra in line.extra_ids {
        builder.toggle_extra(&ExtraId(extra))?;
    }
    builder.set_width(line.width);
    builder.set_drop(line.drop);
    builder.set_quantity(line.quantity);
    if let Some(fullness) = line.fullness {
        builder.set_fullness(fullness);
    }
    if let Some(location) = line.location {
        builder.set_location(location);
    }
    if let Some(notes) = line.notes {
        builder.set_item_notes(notes);
    }

    let id = builder.add_item()?.id;
    if line.margin_percent.is_some() {
        builder.update_item(
            id,
            ItemUpdate { margin_percent: Some(line.margin_percent), ..ItemUpdate::default() },
        )?;
    }
    Ok(())
}
