//! Immutable catalog snapshot for a quoting session.
//!
//! The surrounding application fetches products, price groups, fabrics
//! and extras once per session; edits made elsewhere never reach an
//! in-progress quote.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::extra::{ExtraId, ProductExtra};
use crate::domain::fabric::{Fabric, FabricId};
use crate::domain::price_group::{PriceGroup, PriceGroupId};
use crate::domain::product::{Product, ProductId};

/// Wire shape of a full catalog snapshot, as produced by the external
/// store export. [`Catalog::from_snapshot`] is the usual entry point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub price_groups: Vec<PriceGroup>,
    #[serde(default)]
    pub fabrics: Vec<Fabric>,
    #[serde(default)]
    pub extras: Vec<ProductExtra>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
    price_groups: Vec<PriceGroup>,
    fabrics: Vec<Fabric>,
    extras: Vec<ProductExtra>,
}

impl Catalog {
    /// Builds a session snapshot, dropping inactive records up front so
    /// no later lookup has to re-check the flag.
    pub fn new(
        products: Vec<Product>,
        price_groups: Vec<PriceGroup>,
        fabrics: Vec<Fabric>,
        extras: Vec<ProductExtra>,
    ) -> Self {
        Self {
            products: products.into_iter().filter(|p| p.is_active).collect(),
            price_groups: price_groups.into_iter().filter(|g| g.is_active).collect(),
            fabrics: fabrics.into_iter().filter(|f| f.is_active).collect(),
            extras: extras.into_iter().filter(|e| e.is_active).collect(),
        }
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self::new(snapshot.products, snapshot.price_groups, snapshot.fabrics, snapshot.extras)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn price_groups(&self) -> &[PriceGroup] {
        &self.price_groups
    }

    pub fn fabrics(&self) -> &[Fabric] {
        &self.fabrics
    }

    pub fn extras(&self) -> &[ProductExtra] {
        &self.extras
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn price_group(&self, id: &PriceGroupId) -> Option<&PriceGroup> {
        self.price_groups.iter().find(|group| &group.id == id)
    }

    pub fn fabric(&self, id: &FabricId) -> Option<&Fabric> {
        self.fabrics.iter().find(|fabric| &fabric.id == id)
    }

    pub fn extra(&self, id: &ExtraId) -> Option<&ProductExtra> {
        self.extras.iter().find(|extra| &extra.id == id)
    }

    /// Price groups matching the product's (supplier, category).
    pub fn price_groups_for(&self, product: &Product) -> Vec<&PriceGroup> {
        self.price_groups
            .iter()
            .filter(|group| {
                group.supplier == product.supplier && group.category == product.category
            })
            .collect()
    }

    /// Fabrics matching the product's (supplier, product_category).
    pub fn fabrics_for(&self, product: &Product) -> Vec<&Fabric> {
        self.fabrics
            .iter()
            .filter(|fabric| {
                fabric.supplier == product.supplier
                    && fabric.product_category.as_deref() == Some(product.category.as_str())
            })
            .collect()
    }

    /// Extras applicable to a product: supplier must match, then the
    /// category; an extra whose category misses still applies when its
    /// explicit product-id whitelist names this product.
    pub fn extras_for(&self, product: &Product) -> Vec<&ProductExtra> {
        self.extras
            .iter()
            .filter(|extra| {
                if extra.supplier != product.supplier {
                    return false;
                }
                if extra.product_category == product.category {
                    return true;
                }
                match &extra.product_ids {
                    Some(ids) if !ids.is_empty() => ids.contains(&product.id),
                    _ => false,
                }
            })
            .collect()
    }

    /// Applicable extras grouped by their display category.
    pub fn extras_by_category(&self, product: &Product) -> BTreeMap<String, Vec<&ProductExtra>> {
        let mut groups: BTreeMap<String, Vec<&ProductExtra>> = BTreeMap::new();
        for extra in self.extras_for(product) {
            let bucket = extra.extra_category.clone().unwrap_or_else(|| "General".to_string());
            groups.entry(bucket).or_default().push(extra);
        }
        groups
    }
}
