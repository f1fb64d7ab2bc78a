use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categories with their own grid conventions. Any other category uses
/// the standard width-major grid when priced by grid.
pub const CATEGORY_CURTAINS: &str = "Curtains";
pub const CATEGORY_EXTERNAL_BLINDS: &str = "External Blinds";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A sellable catalog item. The pricing payload is a discriminated
/// union keyed by `pricing_type`; every consumer must match on the
/// variant before reading payload fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub supplier: String,
    pub category: String,
    pub name: String,
    #[serde(flatten)]
    pub pricing: PricingSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_config: Option<QuoteConfig>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.supplier, self.name)
    }

    /// Entry-form configuration, falling back to the all-defaults
    /// config when the catalog record carries none.
    pub fn config(&self) -> QuoteConfig {
        self.quote_config.clone().unwrap_or_default()
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pricing_type", content = "pricing_data", rename_all = "snake_case")]
pub enum PricingSpec {
    Grid(GridPricingData),
    Sqm(SqmPricingData),
    Unit(UnitPricingData),
    /// Legacy or not-yet-migrated pricing tags. Prices to zero with no
    /// warning.
    #[serde(other)]
    Unknown,
}

/// Step-function price tables. Breakpoints are millimetres, ascending.
/// Either a single ungrouped `grid` or a `grids` map keyed by pricing
/// group; table orientation depends on the product category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPricingData {
    pub width_steps: Vec<u32>,
    pub drop_steps: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Vec<Vec<Decimal>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grids: Option<BTreeMap<String, Vec<Vec<Decimal>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SqmPricingData {
    pub price_per_sqm: Decimal,
    /// Declared in supplier data but not enforced anywhere yet. A
    /// floor applied after the rate computation is the natural hook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_charge: Option<Decimal>,
}

/// Per-size unit pricing. No algorithm consumes this yet; unit-priced
/// products resolve to zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitPricingData {
    #[serde(default)]
    pub sizes: BTreeMap<String, Decimal>,
}

/// Per-product entry-form configuration: which inputs are shown, how
/// dimensions are labelled, and how extras are zoned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_width: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_drop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_quantity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_fabric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_extras: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_fullness: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_drop: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promoted_extra_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_extra_ids: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraZone {
    Promoted,
    Enabled,
    Hidden,
}

impl QuoteConfig {
    pub fn show_width(&self) -> bool {
        self.show_width.unwrap_or(true)
    }

    pub fn show_drop(&self) -> bool {
        self.show_drop.unwrap_or(true)
    }

    pub fn show_quantity(&self) -> bool {
        self.show_quantity.unwrap_or(true)
    }

    pub fn show_fabric(&self) -> bool {
        self.show_fabric.unwrap_or(true)
    }

    pub fn show_extras(&self) -> bool {
        self.show_extras.unwrap_or(true)
    }

    pub fn show_fullness(&self) -> bool {
        self.show_fullness.unwrap_or(false)
    }

    pub fn width_label(&self) -> &str {
        self.label_width.as_deref().filter(|label| !label.is_empty()).unwrap_or("Width")
    }

    pub fn drop_label(&self) -> &str {
        self.label_drop.as_deref().filter(|label| !label.is_empty()).unwrap_or("Drop")
    }

    /// Zoning for an extra id. With no zoning lists configured every
    /// extra is plainly enabled; once either list is present, extras
    /// outside both are hidden.
    pub fn extra_zone(&self, extra_id: &str) -> ExtraZone {
        if self.promoted_extra_ids.iter().any(|id| id == extra_id) {
            return ExtraZone::Promoted;
        }
        if self.enabled_extra_ids.iter().any(|id| id == extra_id) {
            return ExtraZone::Enabled;
        }
        if self.promoted_extra_ids.is_empty() && self.enabled_extra_ids.is_empty() {
            ExtraZone::Enabled
        } else {
            ExtraZone::Hidden
        }
    }
}
