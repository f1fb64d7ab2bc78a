use thiserror::Error;

use crate::domain::quote::QuoteStatus;

/// Caller-level validation failures around the quote draft. Pricing
/// itself never errors; blocked prices travel as warnings inside
/// [`crate::pricing::PricingOutcome`] and surface here only when an
/// add is attempted against them.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("no product selected")]
    NoProductSelected,
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    #[error("unknown fabric: {0}")]
    UnknownFabric(String),
    #[error("unknown price group: {0}")]
    UnknownPriceGroup(String),
    #[error("extra {0} is not available for the selected product")]
    ExtraNotAvailable(String),
    #[error("unknown line item: {0}")]
    UnknownLineItem(String),
    #[error("{dimension} is required and must be greater than zero")]
    MissingDimension { dimension: String },
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("pricing blocked: {0}")]
    PricingBlocked(String),
    #[error("computed unit cost must be greater than zero")]
    NonPositiveCost,
    #[error("invalid quote transition from {from:?} to {to:?}")]
    InvalidStatusTransition { from: QuoteStatus, to: QuoteStatus },
}
