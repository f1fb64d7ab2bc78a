use std::path::PathBuf;

use clap::Args;
use rust_decimal::Decimal;
use sashquote_core::config::AppConfig;
use sashquote_core::{
    ExtraId, FabricId, Fullness, ItemUpdate, PriceGroupId, ProductId, QuoteBuilder, QuoteDraft,
    QuoteError, SelectedExtra,
};
use serde::Serialize;

use super::{load_catalog, serialize_payload, CommandResult};

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Catalog snapshot to price against, overriding the configured path
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Product id
    #[arg(long)]
    pub product: String,
    /// Width in millimetres
    #[arg(long, default_value_t = 0)]
    pub width: u32,
    /// Drop in millimetres
    #[arg(long, default_value_t = 0)]
    pub drop: u32,
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
    /// Price group id
    #[arg(long)]
    pub group: Option<String>,
    /// Fabric id
    #[arg(long)]
    pub fabric: Option<String>,
    /// Extra id, repeatable
    #[arg(long = "extra")]
    pub extras: Vec<String>,
    /// Curtain fullness: 100 or 160
    #[arg(long)]
    pub fullness: Option<Fullness>,
    /// Margin percent for this line, overriding the configured default
    #[arg(long)]
    pub margin: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct PriceReport {
    product_id: String,
    product_name: String,
    width: u32,
    drop: u32,
    quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    fabric_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price_group: Option<String>,
    extras: Vec<SelectedExtra>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pricing_note: Option<String>,
    cost_price: Decimal,
    margin_percent: Decimal,
    sell_price: Decimal,
    calculated_price: Decimal,
}

#[derive(Debug, Serialize)]
struct PriceRejection {
    status: &'static str,
    product_id: String,
    message: String,
}

pub fn run(config: &AppConfig, args: PriceArgs) -> anyhow::Result<CommandResult> {
    let catalog_path = args.catalog.clone().unwrap_or_else(|| config.catalog.path.clone());
    let catalog = load_catalog(&catalog_path)?;

    let draft = QuoteDraft::with_margin(config.quoting.default_margin_percent);
    let mut builder = QuoteBuilder::with_draft(catalog, draft);

    let outcome = price_line(&mut builder, &args);
    match outcome {
        Ok(report) => Ok(CommandResult::success(serialize_payload(&report))),
        Err(error) => {
            let rejection = PriceRejection {
                status: "rejected",
                product_id: args.product.clone(),
                message: error.to_string(),
            };
            Ok(CommandResult::failure(serialize_payload(&rejection), 1))
        }
    }
}

fn price_line(builder: &mut QuoteBuilder, args: &PriceArgs) -> Result<PriceReport, QuoteError> {
    builder.select_product(ProductId(args.product.clone()))?;
    builder.select_price_group(args.group.clone().map(PriceGroupId))?;
    builder.select_fabric(args.fabric.clone().map(FabricId))?;
    for extra in &args.extras {
        builder.toggle_extra(&ExtraId(extra.clone()))?;
    }
    builder.set_width(args.width);
    builder.set_drop(args.drop);
    builder.set_quantity(args.quantity);
    if let Some(fullness) = args.fullness {
        builder.set_fullness(fullness);
    }

    let id = builder.add_item()?.id;
    if args.margin.is_some() {
        builder.update_item(
            id,
            ItemUpdate { margin_percent: Some(args.margin), ..ItemUpdate::default() },
        )?;
    }

    let draft = builder.draft();
    let item = draft.item(id).ok_or_else(|| QuoteError::UnknownLineItem(id.to_string()))?;
    Ok(PriceReport {
        product_id: item.product_id.to_string(),
        product_name: item.product_name.clone(),
        width: item.width,
        drop: item.drop,
        quantity: item.quantity,
        fabric_name: (!item.fabric_name.is_empty()).then(|| item.fabric_name.clone()),
        price_group: item.price_group.clone(),
        extras: item.extras.clone(),
        pricing_note: item.pricing_note.clone(),
        cost_price: item.cost_price,
        margin_percent: draft.effective_margin(item),
        sell_price: item.sell_price,
        calculated_price: item.calculated_price,
    })
}
