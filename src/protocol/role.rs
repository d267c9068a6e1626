//! Role definitions
//!
//! The closed set of operations a connection can perform.

use std::fmt;
use std::str::FromStr;

use crate::error::WorkerError;

/// Operation selected by the first frame on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    AddStore,
    FindStore,
    FindProduct,
    FindProductHiddenAware,
    IncreaseQuantity,
    NewProduct,
    RemoveProduct,
    DecreaseQuantity,
    SalesByStoreCategory,
    SalesByProductCategory,
    GeoSearch,
    FilteredSearch,
    FetchProducts,
    Purchase,
    Rate,
    CustomerPurchasesByStore,
}

impl Role {
    /// Every role, in wire-table order
    pub const ALL: [Role; 16] = [
        Role::AddStore,
        Role::FindStore,
        Role::FindProduct,
        Role::FindProductHiddenAware,
        Role::IncreaseQuantity,
        Role::NewProduct,
        Role::RemoveProduct,
        Role::DecreaseQuantity,
        Role::SalesByStoreCategory,
        Role::SalesByProductCategory,
        Role::GeoSearch,
        Role::FilteredSearch,
        Role::FetchProducts,
        Role::Purchase,
        Role::Rate,
        Role::CustomerPurchasesByStore,
    ];

    /// Canonical tag sent by masters
    pub fn tag(&self) -> &'static str {
        match self {
            Role::AddStore => "store-add",
            Role::FindStore => "find-store",
            Role::FindProduct => "find-product",
            Role::FindProductHiddenAware => "find-product-hidden-aware",
            Role::IncreaseQuantity => "increase-quantity",
            Role::NewProduct => "new-product",
            Role::RemoveProduct => "remove-product",
            Role::DecreaseQuantity => "decrease-quantity",
            Role::SalesByStoreCategory => "sales-by-store-category",
            Role::SalesByProductCategory => "sales-by-product-category",
            Role::GeoSearch => "geo-search",
            Role::FilteredSearch => "filtered-search",
            Role::FetchProducts => "fetch-products",
            Role::Purchase => "purchase",
            Role::Rate => "rate",
            Role::CustomerPurchasesByStore => "customer-purchases-by-store",
        }
    }

    /// Tag used by older masters, still accepted
    pub fn legacy_tag(&self) -> &'static str {
        match self {
            Role::AddStore => "manager",
            Role::FindStore => "findStore",
            Role::FindProduct => "findProduct",
            Role::FindProductHiddenAware => "findProduct2",
            Role::IncreaseQuantity => "AmountInc",
            Role::NewProduct => "NewProduct",
            Role::RemoveProduct => "remove",
            Role::DecreaseQuantity => "AmountDec",
            Role::SalesByStoreCategory => "storeType",
            Role::SalesByProductCategory => "productCategory",
            Role::GeoSearch => "client",
            Role::FilteredSearch => "filter",
            Role::FetchProducts => "fetchProducts",
            Role::Purchase => "purchase",
            Role::Rate => "rate",
            Role::CustomerPurchasesByStore => "customerPurchasesByStore",
        }
    }

    /// Resolve a canonical or legacy tag
    pub fn from_tag(tag: &str) -> Option<Role> {
        Self::ALL
            .into_iter()
            .find(|role| role.tag() == tag || role.legacy_tag() == tag)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Role {
    type Err = WorkerError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Role::from_tag(tag).ok_or_else(|| WorkerError::UnknownRole(tag.to_string()))
    }
}
