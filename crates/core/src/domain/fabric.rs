use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FabricId(pub String);

impl std::fmt::Display for FabricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A fabric option scoped to a (supplier, product_category). The
/// `price_group` reference feeds curtain grid-key construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fabric {
    pub id: FabricId,
    pub supplier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    pub brand: String,
    pub name: String,
    pub price_group: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Fabric {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }
}

fn default_true() -> bool {
    true
}
