use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::extra::SelectedExtra;
use crate::domain::product::ProductId;
use crate::errors::QuoteError;
use crate::margin::apply_single_margin;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItemId(pub Uuid);

impl LineItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

/// One priced line of a quote draft.
///
/// `cost_price` is the per-unit cost before margin. `sell_price` and
/// `calculated_price` are caches of the margin formula applied to it;
/// [`LineItem::reprice`] must run whenever the effective margin or the
/// quantity changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub location: String,
    pub width: u32,
    pub drop: u32,
    pub quantity: u32,
    pub fabric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<SelectedExtra>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_note: Option<String>,
    pub cost_price: Decimal,
    /// `None` inherits the category or overall margin; `Some(0)` is an
    /// honoured explicit 0% override.
    pub margin_percent: Option<Decimal>,
    pub sell_price: Decimal,
    pub calculated_price: Decimal,
    pub notes: String,
}

impl LineItem {
    /// Recompute the cached sell figures from the effective margin.
    pub fn reprice(&mut self, effective_margin: Decimal) {
        self.sell_price = apply_single_margin(self.cost_price, effective_margin);
        self.calculated_price = self.sell_price * Decimal::from(self.quantity);
    }
}

/// Derived quote-wide figures. Always recomputed from the item list,
/// never stored alongside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub total_cost: Decimal,
    pub total_sell: Decimal,
    pub total_margin: Decimal,
    pub average_margin_percent: Decimal,
    pub gst: Decimal,
    pub total_inc_gst: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub customer_name: String,
    pub status: QuoteStatus,
    pub items: Vec<LineItem>,
    pub overall_margin_percent: Decimal,
    pub show_gst: bool,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (self.status, next),
            (QuoteStatus::Draft, QuoteStatus::Sent)
                | (QuoteStatus::Sent, QuoteStatus::Approved)
                | (QuoteStatus::Sent, QuoteStatus::Rejected)
                | (QuoteStatus::Rejected, QuoteStatus::Draft)
        )
    }

    pub fn transition_to(&mut self, next: QuoteStatus) -> Result<(), QuoteError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(QuoteError::InvalidStatusTransition { from: self.status, to: next })
    }
}
