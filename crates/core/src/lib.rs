//! Pricing and margin engine for a custom window-furnishings quoting
//! tool. Pure in-memory computation: catalog records in, priced line
//! items and totals out.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod margin;
pub mod pricing;

pub use builder::{reduce, ItemForm, ItemUpdate, LivePrice, QuoteAction, QuoteBuilder, QuoteDraft};
pub use catalog::{Catalog, CatalogSnapshot};
pub use domain::extra::{ExtraId, ExtraPriceType, ProductExtra, SelectedExtra};
pub use domain::fabric::{Fabric, FabricId};
pub use domain::price_group::{PriceGroup, PriceGroupId};
pub use domain::product::{
    ExtraZone, GridPricingData, PricingSpec, Product, ProductId, QuoteConfig, SqmPricingData,
    UnitPricingData, CATEGORY_CURTAINS, CATEGORY_EXTERNAL_BLINDS,
};
pub use domain::quote::{LineItem, LineItemId, Quote, QuoteId, QuoteStatus, QuoteTotals};
pub use errors::QuoteError;
pub use margin::{
    apply_single_margin, margin_breakdown, margin_percent_of, quote_totals, ItemPricing,
    MarginBreakdown,
};
pub use pricing::{
    calculate_extra_price, calculate_price, select_extra, Fullness, PricingOptions,
    PricingOutcome,
};
