//! Quote line-item aggregation.
//!
//! State lives in [`QuoteDraft`] and changes only through
//! [`reduce`], which returns a fully consistent next state: any action
//! that can move an item's effective margin or quantity recomputes the
//! cached sell figures before the state is handed back, so derived
//! totals can never go stale between mutations.
//!
//! [`QuoteBuilder`] layers the entry-form session on top: product and
//! option selection, live pricing on every change, and the
//! validate-price-append path for committing a line.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::extra::{ExtraId, SelectedExtra};
use crate::domain::fabric::FabricId;
use crate::domain::price_group::{PriceGroup, PriceGroupId};
use crate::domain::product::{Product, ProductId};
use crate::domain::quote::{LineItem, LineItemId, Quote, QuoteId, QuoteStatus, QuoteTotals};
use crate::errors::QuoteError;
use crate::margin::{quote_totals, ItemPricing};
use crate::pricing::{
    calculate_extra_price, calculate_price, select_extra, Fullness, PricingOptions,
    PricingOutcome,
};

/// The quote being assembled in a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub overall_margin_percent: Decimal,
    /// Optional per-category margin overrides, between item overrides
    /// and the overall margin in precedence.
    pub category_margins: BTreeMap<String, Decimal>,
    pub show_gst: bool,
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self::with_margin(Decimal::from(45))
    }
}

impl QuoteDraft {
    pub fn with_margin(overall_margin_percent: Decimal) -> Self {
        Self {
            customer_name: String::new(),
            items: Vec::new(),
            overall_margin_percent,
            category_margins: BTreeMap::new(),
            show_gst: true,
        }
    }

    /// Margin that applies to an item right now: item override, then
    /// category override, then the overall margin.
    pub fn effective_margin(&self, item: &LineItem) -> Decimal {
        item.margin_percent
            .or_else(|| self.category_margins.get(&item.category).copied())
            .unwrap_or(self.overall_margin_percent)
    }

    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Derived quote-wide figures, always computed fresh from the item
    /// list. Category overrides are resolved here before the two-level
    /// totals fold runs.
    pub fn totals(&self) -> QuoteTotals {
        let items: Vec<ItemPricing> = self
            .items
            .iter()
            .map(|item| ItemPricing {
                quantity: item.quantity,
                cost_price: item.cost_price,
                margin_percent: item
                    .margin_percent
                    .or_else(|| self.category_margins.get(&item.category).copied()),
            })
            .collect();
        quote_totals(&items, self.overall_margin_percent)
    }

    pub fn into_quote(self, id: QuoteId) -> Quote {
        Quote {
            id,
            customer_name: self.customer_name,
            status: QuoteStatus::Draft,
            items: self.items,
            overall_margin_percent: self.overall_margin_percent,
            show_gst: self.show_gst,
            created_at: Utc::now(),
        }
    }

    fn reprice_all(&mut self) {
        let category_margins = self.category_margins.clone();
        let overall = self.overall_margin_percent;
        for item in &mut self.items {
            let effective = item
                .margin_percent
                .or_else(|| category_margins.get(&item.category).copied())
                .unwrap_or(overall);
            item.reprice(effective);
        }
    }
}

/// Partial update for an existing line item. `margin_percent` is
/// doubly optional: the outer level means "leave untouched", the inner
/// carries the new override where `None` returns the item to
/// inheriting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percent: Option<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuoteAction {
    AddItem(Box<LineItem>),
    RemoveItem(LineItemId),
    UpdateItem { id: LineItemId, update: ItemUpdate },
    SetOverallMargin(Decimal),
    SetCategoryMargin { category: String, margin: Option<Decimal> },
    SetShowGst(bool),
    SetCustomerName(String),
}

/// Apply one action to the draft, producing the next consistent state.
/// Unknown targets are rejected with no mutation.
pub fn reduce(draft: &QuoteDraft, action: QuoteAction) -> Result<QuoteDraft, QuoteError> {
    let mut next = draft.clone();

    match action {
        QuoteAction::AddItem(item) => {
            let mut item = *item;
            let effective = next.effective_margin(&item);
            item.reprice(effective);
            next.items.push(item);
        }
        QuoteAction::RemoveItem(id) => {
            if next.item(id).is_none() {
                return Err(QuoteError::UnknownLineItem(id.to_string()));
            }
            next.items.retain(|item| item.id != id);
        }
        QuoteAction::UpdateItem { id, update } => {
            let category_margins = next.category_margins.clone();
            let overall = next.overall_margin_percent;
            let item = next
                .items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or_else(|| QuoteError::UnknownLineItem(id.to_string()))?;

            if let Some(quantity) = update.quantity {
                if quantity == 0 {
                    return Err(QuoteError::InvalidQuantity);
                }
                item.quantity = quantity;
            }
            if let Some(margin) = update.margin_percent {
                item.margin_percent = margin;
            }
            if let Some(location) = update.location {
                item.location = location;
            }
            if let Some(notes) = update.notes {
                item.notes = notes;
            }

            let effective = item
                .margin_percent
                .or_else(|| category_margins.get(&item.category).copied())
                .unwrap_or(overall);
            item.reprice(effective);
        }
        QuoteAction::SetOverallMargin(margin) => {
            next.overall_margin_percent = margin;
            next.reprice_all();
        }
        QuoteAction::SetCategoryMargin { category, margin } => {
            match margin {
                Some(margin) => {
                    next.category_margins.insert(category, margin);
                }
                None => {
                    next.category_margins.remove(&category);
                }
            }
            next.reprice_all();
        }
        QuoteAction::SetShowGst(show) => next.show_gst = show,
        QuoteAction::SetCustomerName(name) => next.customer_name = name,
    }

    Ok(next)
}

/// Live price for the configuration currently on the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivePrice {
    /// Unit cost x quantity for the current inputs.
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Entry-form state for the line item being configured.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemForm {
    pub product_id: Option<ProductId>,
    pub fabric_id: Option<FabricId>,
    pub price_group_id: Option<PriceGroupId>,
    pub width: u32,
    pub drop: u32,
    pub quantity: u32,
    pub fullness: Fullness,
    pub extra_ids: Vec<ExtraId>,
    pub location: String,
    pub notes: String,
}

impl ItemForm {
    fn new() -> Self {
        Self { quantity: 1, ..Self::default() }
    }

    /// Reset after a successful add: dimensions, quantity, extras and
    /// fullness clear; product, fabric and group selection persist for
    /// rapid repeated entry.
    fn reset_transient(&mut self) {
        self.width = 0;
        self.drop = 0;
        self.quantity = 1;
        self.fullness = Fullness::default();
        self.extra_ids.clear();
        self.location.clear();
        self.notes.clear();
    }
}

/// One quoting session: an immutable catalog snapshot, the draft, and
/// the entry form.
#[derive(Clone, Debug)]
pub struct QuoteBuilder {
    catalog: Catalog,
    draft: QuoteDraft,
    form: ItemForm,
}

impl QuoteBuilder {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, draft: QuoteDraft::default(), form: ItemForm::new() }
    }

    pub fn with_draft(catalog: Catalog, draft: QuoteDraft) -> Self {
        Self { catalog, draft, form: ItemForm::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    pub fn form(&self) -> &ItemForm {
        &self.form
    }

    pub fn totals(&self) -> QuoteTotals {
        self.draft.totals()
    }

    pub fn into_quote(self, id: QuoteId) -> Quote {
        self.draft.into_quote(id)
    }

    // --- form configuration ---

    /// Selecting a product invalidates the relevance-scoped choices
    /// (group, fabric, extras) made under the previous product.
    pub fn select_product(&mut self, id: ProductId) -> Result<(), QuoteError> {
        if self.catalog.product(&id).is_none() {
            return Err(QuoteError::UnknownProduct(id.to_string()));
        }
        if self.form.product_id.as_ref() != Some(&id) {
            self.form.fabric_id = None;
            self.form.price_group_id = None;
            self.form.extra_ids.clear();
        }
        self.form.product_id = Some(id);
        Ok(())
    }

    pub fn clear_product(&mut self) {
        self.form = ItemForm::new();
    }

    pub fn select_fabric(&mut self, id: Option<FabricId>) -> Result<(), QuoteError> {
        if let Some(id) = &id {
            if self.catalog.fabric(id).is_none() {
                return Err(QuoteError::UnknownFabric(id.to_string()));
            }
        }
        self.form.fabric_id = id;
        Ok(())
    }

    pub fn select_price_group(&mut self, id: Option<PriceGroupId>) -> Result<(), QuoteError> {
        if let Some(id) = &id {
            if self.catalog.price_group(id).is_none() {
                return Err(QuoteError::UnknownPriceGroup(id.to_string()));
            }
        }
        self.form.price_group_id = id;
        Ok(())
    }

    pub fn set_width(&mut self, width: u32) {
        self.form.width = width;
    }

    pub fn set_drop(&mut self, drop: u32) {
        self.form.drop = drop;
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.form.quantity = quantity;
    }

    pub fn set_fullness(&mut self, fullness: Fullness) {
        self.form.fullness = fullness;
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.form.location = location.into();
    }

    pub fn set_item_notes(&mut self, notes: impl Into<String>) {
        self.form.notes = notes.into();
    }

    /// Select or deselect an extra for the line being configured. The
    /// extra must be applicable to the selected product.
    pub fn toggle_extra(&mut self, id: &ExtraId) -> Result<(), QuoteError> {
        let product = self.selected_product()?;
        if !self.catalog.extras_for(product).iter().any(|extra| &extra.id == id) {
            return Err(QuoteError::ExtraNotAvailable(id.to_string()));
        }

        if let Some(position) = self.form.extra_ids.iter().position(|selected| selected == id) {
            self.form.extra_ids.remove(position);
        } else {
            self.form.extra_ids.push(id.clone());
        }
        Ok(())
    }

    // --- pricing ---

    fn selected_product(&self) -> Result<&Product, QuoteError> {
        let id = self.form.product_id.as_ref().ok_or(QuoteError::NoProductSelected)?;
        self.catalog.product(id).ok_or_else(|| QuoteError::UnknownProduct(id.to_string()))
    }

    fn selected_price_group(&self) -> Option<&PriceGroup> {
        self.form.price_group_id.as_ref().and_then(|id| self.catalog.price_group(id))
    }

    fn base_outcome(&self, product: &Product, width: u32, drop: u32) -> PricingOutcome {
        calculate_price(
            product,
            width,
            drop,
            &PricingOptions {
                price_group: self.selected_price_group(),
                fullness: self.form.fullness,
            },
        )
    }

    /// Selected extras re-priced against the current base price, so
    /// percentage and dimension-scaled extras follow every form change.
    fn priced_extras(&self, base_price: Decimal, width: u32, drop: u32) -> Vec<SelectedExtra> {
        self.form
            .extra_ids
            .iter()
            .filter_map(|id| self.catalog.extra(id))
            .map(|extra| select_extra(extra, base_price, width, drop))
            .collect()
    }

    /// Current price for the form as configured, recomputed on every
    /// call. A blocked base price reports zero with the warning.
    pub fn live_price(&self) -> LivePrice {
        let Ok(product) = self.selected_product() else {
            return LivePrice { amount: Decimal::ZERO, warning: None, note: None };
        };

        let outcome = self.base_outcome(product, self.form.width, self.form.drop);
        if outcome.is_blocked() {
            return LivePrice { amount: Decimal::ZERO, warning: outcome.warning, note: None };
        }

        let extras_total: Decimal = self
            .form
            .extra_ids
            .iter()
            .filter_map(|id| self.catalog.extra(id))
            .map(|extra| {
                calculate_extra_price(extra, outcome.price, self.form.width, self.form.drop)
            })
            .sum();
        let quantity = if self.form.quantity == 0 { 1 } else { self.form.quantity };
        let amount = (outcome.price + extras_total) * Decimal::from(quantity);

        LivePrice { amount, warning: None, note: outcome.note }
    }

    // --- draft mutation ---

    /// Validate the form, price it, and commit a new line item.
    ///
    /// Rejections mutate nothing: a visible dimension left at zero, a
    /// blocked base price, or a non-positive unit cost each report
    /// their own error.
    pub fn add_item(&mut self) -> Result<&LineItem, QuoteError> {
        let product = self.selected_product()?;
        let config = product.config();

        if config.show_width() && self.form.width == 0 {
            return Err(QuoteError::MissingDimension {
                dimension: config.width_label().to_string(),
            });
        }
        if config.show_drop() && self.form.drop == 0 {
            return Err(QuoteError::MissingDimension {
                dimension: config.drop_label().to_string(),
            });
        }
        if self.form.quantity == 0 {
            return Err(QuoteError::InvalidQuantity);
        }

        // Hidden dimensions price as zero regardless of stray input.
        let width = if config.show_width() { self.form.width } else { 0 };
        let drop = if config.show_drop() { self.form.drop } else { 0 };

        let outcome = self.base_outcome(product, width, drop);
        if let Some(warning) = outcome.warning.clone() {
            return Err(QuoteError::PricingBlocked(warning));
        }

        let extras = self.priced_extras(outcome.price, width, drop);
        let extras_total: Decimal = extras.iter().map(|extra| extra.calculated_price).sum();
        let cost_price = outcome.price + extras_total;
        if cost_price <= Decimal::ZERO {
            return Err(QuoteError::NonPositiveCost);
        }

        let fabric_name = self
            .form
            .fabric_id
            .as_ref()
            .and_then(|id| self.catalog.fabric(id))
            .map(|fabric| fabric.display_name())
            .unwrap_or_default();
        let price_group = self.selected_price_group().map(|group| group.group_name.clone());

        let item = LineItem {
            id: LineItemId::new(),
            product_id: product.id.clone(),
            product_name: product.display_name(),
            category: product.category.clone(),
            location: self.form.location.clone(),
            width,
            drop,
            quantity: self.form.quantity,
            fabric_name,
            price_group,
            extras,
            pricing_note: outcome.note,
            cost_price,
            margin_percent: None,
            sell_price: Decimal::ZERO,
            calculated_price: Decimal::ZERO,
            notes: self.form.notes.clone(),
        };

        let id = item.id;
        self.draft = reduce(&self.draft, QuoteAction::AddItem(Box::new(item)))?;
        self.form.reset_transient();
        self.draft.item(id).ok_or_else(|| QuoteError::UnknownLineItem(id.to_string()))
    }

    pub fn remove_item(&mut self, id: LineItemId) -> Result<(), QuoteError> {
        self.apply(QuoteAction::RemoveItem(id))
    }

    pub fn update_item(&mut self, id: LineItemId, update: ItemUpdate) -> Result<(), QuoteError> {
        self.apply(QuoteAction::UpdateItem { id, update })
    }

    /// Batch-reprices every item without an override the moment the
    /// overall margin moves, keeping totals consistent with what is
    /// displayed.
    pub fn set_overall_margin(&mut self, margin: Decimal) -> Result<(), QuoteError> {
        self.apply(QuoteAction::SetOverallMargin(margin))
    }

    pub fn set_category_margin(
        &mut self,
        category: impl Into<String>,
        margin: Option<Decimal>,
    ) -> Result<(), QuoteError> {
        self.apply(QuoteAction::SetCategoryMargin { category: category.into(), margin })
    }

    pub fn set_show_gst(&mut self, show: bool) -> Result<(), QuoteError> {
        self.apply(QuoteAction::SetShowGst(show))
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) -> Result<(), QuoteError> {
        self.apply(QuoteAction::SetCustomerName(name.into()))
    }

    fn apply(&mut self, action: QuoteAction) -> Result<(), QuoteError> {
        self.draft = reduce(&self.draft, action)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{reduce, ItemUpdate, QuoteAction, QuoteDraft};
    use crate::domain::extra::SelectedExtra;
    use crate::domain::product::ProductId;
    use crate::domain::quote::{LineItem, LineItemId};
    use crate::errors::QuoteError;

    fn item(category: &str, cost: Decimal) -> LineItem {
        LineItem {
            id: LineItemId::new(),
            product_id: ProductId("p-1".to_string()),
            product_name: "Creative - Roller".to_string(),
            category: category.to_string(),
            location: String::new(),
            width: 1200,
            drop: 1500,
            quantity: 1,
            fabric_name: String::new(),
            price_group: None,
            extras: Vec::<SelectedExtra>::new(),
            pricing_note: None,
            cost_price: cost,
            margin_percent: None,
            sell_price: Decimal::ZERO,
            calculated_price: Decimal::ZERO,
            notes: String::new(),
        }
    }

    #[test]
    fn add_applies_the_effective_margin_immediately() {
        let draft = QuoteDraft::with_margin(Decimal::from(50));
        let next = reduce(&draft, QuoteAction::AddItem(Box::new(item("Internal Blinds", Decimal::from(100)))))
            .expect("add");
        assert_eq!(next.items[0].sell_price, Decimal::from(150));
        assert_eq!(next.items[0].calculated_price, Decimal::from(150));
    }

    #[test]
    fn overall_margin_change_reprices_only_inheriting_items() {
        let draft = QuoteDraft::with_margin(Decimal::from(50));
        let draft =
            reduce(&draft, QuoteAction::AddItem(Box::new(item("Internal Blinds", Decimal::from(100)))))
                .expect("add one");
        let draft =
            reduce(&draft, QuoteAction::AddItem(Box::new(item("Curtains", Decimal::from(100)))))
                .expect("add two");

        let pinned = draft.items[1].id;
        let draft = reduce(
            &draft,
            QuoteAction::UpdateItem {
                id: pinned,
                update: ItemUpdate {
                    margin_percent: Some(Some(Decimal::from(20))),
                    ..ItemUpdate::default()
                },
            },
        )
        .expect("pin margin");

        let draft = reduce(&draft, QuoteAction::SetOverallMargin(Decimal::from(10))).expect("move");
        assert_eq!(draft.items[0].sell_price, Decimal::from(110));
        assert_eq!(draft.items[1].sell_price, Decimal::from(120));
    }

    #[test]
    fn category_margin_sits_between_item_and_overall() {
        let draft = QuoteDraft::with_margin(Decimal::from(50));
        let draft =
            reduce(&draft, QuoteAction::AddItem(Box::new(item("Curtains", Decimal::from(100)))))
                .expect("add");

        let draft = reduce(
            &draft,
            QuoteAction::SetCategoryMargin {
                category: "Curtains".to_string(),
                margin: Some(Decimal::from(30)),
            },
        )
        .expect("category margin");
        assert_eq!(draft.items[0].sell_price, Decimal::from(130));

        let pinned = draft.items[0].id;
        let draft = reduce(
            &draft,
            QuoteAction::UpdateItem {
                id: pinned,
                update: ItemUpdate {
                    margin_percent: Some(Some(Decimal::from(15))),
                    ..ItemUpdate::default()
                },
            },
        )
        .expect("item margin");
        assert_eq!(draft.items[0].sell_price, Decimal::from(115));
    }

    #[test]
    fn explicit_zero_override_survives_overall_margin_changes() {
        let draft = QuoteDraft::with_margin(Decimal::from(50));
        let draft =
            reduce(&draft, QuoteAction::AddItem(Box::new(item("Internal Blinds", Decimal::from(80)))))
                .expect("add");
        let id = draft.items[0].id;

        let draft = reduce(
            &draft,
            QuoteAction::UpdateItem {
                id,
                update: ItemUpdate {
                    margin_percent: Some(Some(Decimal::ZERO)),
                    ..ItemUpdate::default()
                },
            },
        )
        .expect("zero override");
        assert_eq!(draft.items[0].sell_price, Decimal::from(80));

        let draft = reduce(&draft, QuoteAction::SetOverallMargin(Decimal::from(90))).expect("move");
        assert_eq!(draft.items[0].sell_price, Decimal::from(80));
    }

    #[test]
    fn quantity_update_recomputes_the_line_total() {
        let draft = QuoteDraft::with_margin(Decimal::from(50));
        let draft =
            reduce(&draft, QuoteAction::AddItem(Box::new(item("Internal Blinds", Decimal::from(100)))))
                .expect("add");
        let id = draft.items[0].id;

        let draft = reduce(
            &draft,
            QuoteAction::UpdateItem {
                id,
                update: ItemUpdate { quantity: Some(3), ..ItemUpdate::default() },
            },
        )
        .expect("quantity");
        assert_eq!(draft.items[0].sell_price, Decimal::from(150));
        assert_eq!(draft.items[0].calculated_price, Decimal::from(450));
    }

    #[test]
    fn removing_an_unknown_item_is_rejected_without_mutation() {
        let draft = QuoteDraft::default();
        let error = reduce(&draft, QuoteAction::RemoveItem(LineItemId::new()))
            .expect_err("unknown id must fail");
        assert!(matches!(error, QuoteError::UnknownLineItem(_)));
    }

    #[test]
    fn totals_resolve_category_overrides_before_folding() {
        let draft = QuoteDraft::with_margin(Decimal::from(50));
        let draft =
            reduce(&draft, QuoteAction::AddItem(Box::new(item("Curtains", Decimal::from(100)))))
                .expect("add");
        let draft = reduce(
            &draft,
            QuoteAction::SetCategoryMargin {
                category: "Curtains".to_string(),
                margin: Some(Decimal::from(20)),
            },
        )
        .expect("category margin");

        let totals = draft.totals();
        assert_eq!(totals.total_sell, Decimal::from(120));
        assert_eq!(totals.total_sell, draft.items[0].calculated_price);
    }
}
