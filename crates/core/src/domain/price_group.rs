use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceGroupId(pub String);

impl std::fmt::Display for PriceGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A named pricing tier for a (supplier, category) pair. `group_code`
/// is the grid lookup key; `multiplier` scales grid results for the
/// algorithms that apply it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceGroup {
    pub id: PriceGroupId,
    pub supplier: String,
    pub category: String,
    pub group_code: String,
    pub group_name: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_true() -> bool {
    true
}
