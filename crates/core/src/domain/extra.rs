use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtraId(pub String);

impl std::fmt::Display for ExtraId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How an extra's `price` field is interpreted. For `Percentage` the
/// field is the percentage value itself, taken against the base unit
/// price of the line, not a currency amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPriceType {
    #[default]
    Fixed,
    PerMetreWidth,
    PerSqm,
    Percentage,
    /// Any tag this build does not know. Priced as a flat amount.
    #[serde(other)]
    Unrecognized,
}

/// An optional add-on scoped to a (supplier, product_category), or
/// whitelisted per product id when the category does not match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductExtra {
    pub id: ExtraId,
    pub supplier: String,
    pub product_category: String,
    /// Grouping bucket for the entry form, e.g. "Motorisation".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_category: Option<String>,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub price_type: ExtraPriceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<ProductId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// An extra as committed to a line item, with the monetary amount it
/// resolved to at selection time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedExtra {
    pub id: ExtraId,
    pub name: String,
    pub price: Decimal,
    pub price_type: ExtraPriceType,
    pub calculated_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::{ExtraPriceType, ProductExtra};

    #[test]
    fn missing_price_type_defaults_to_fixed() {
        let raw = r#"{
            "id": "e-1",
            "supplier": "Creative",
            "product_category": "Internal Blinds",
            "name": "Metal Chain Upgrade",
            "price": 15
        }"#;

        let extra: ProductExtra = serde_json::from_str(raw).expect("extra");
        assert_eq!(extra.price_type, ExtraPriceType::Fixed);
    }

    #[test]
    fn unknown_price_type_maps_to_unrecognized() {
        let raw = r#"{
            "id": "e-2",
            "supplier": "Creative",
            "product_category": "Internal Blinds",
            "name": "Mystery Charge",
            "price": 5,
            "price_type": "per_linear_furlong"
        }"#;

        let extra: ProductExtra = serde_json::from_str(raw).expect("extra");
        assert_eq!(extra.price_type, ExtraPriceType::Unrecognized);
    }
}
