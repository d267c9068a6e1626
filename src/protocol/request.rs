//! Request definitions
//!
//! One body struct per role. Field order is the order on the wire.

use serde::{Deserialize, Serialize};

use super::Role;
use crate::catalog::{Product, Purchase, Store};

/// Body for `store-add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddStore {
    pub store: Store,
}

/// Body for `find-store`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindStore {
    pub store_name: String,
}

/// Body for `find-product`, `find-product-hidden-aware`, and `remove-product`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub store_name: String,
    pub product_name: String,
}

/// Body for `increase-quantity` and `decrease-quantity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChange {
    pub store_name: String,
    pub product_name: String,
    pub amount: u32,
}

/// Body for `new-product`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub store_name: String,
    pub product: Product,
}

/// Body for both sales aggregations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
}

/// Body for `geo-search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoQuery {
    pub request_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

/// Body for `filtered-search`
///
/// Empty `categories`, zero `min_stars`, and empty `price_category` each
/// match every store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub request_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub categories: Vec<String>,
    pub min_stars: f64,
    pub price_category: String,
}

/// Body for `fetch-products`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchProducts {
    pub request_id: String,
    pub store_name: String,
}

/// Body for `purchase`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub request_id: String,
    pub purchase: Purchase,
    pub store_name: String,
}

/// Body for `rate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateStore {
    pub request_id: String,
    pub store_name: String,
    pub rating: i32,
}

/// Body for `customer-purchases-by-store`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerQuery {
    pub customer_name: String,
    pub store_name: String,
}

/// A parsed request: the role plus its typed body
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    AddStore(AddStore),
    FindStore(FindStore),
    FindProduct(ProductRef),
    FindProductHiddenAware(ProductRef),
    IncreaseQuantity(QuantityChange),
    NewProduct(NewProduct),
    RemoveProduct(ProductRef),
    DecreaseQuantity(QuantityChange),
    SalesByStoreCategory(CategoryQuery),
    SalesByProductCategory(CategoryQuery),
    GeoSearch(GeoQuery),
    FilteredSearch(FilterQuery),
    FetchProducts(FetchProducts),
    Purchase(PurchaseOrder),
    Rate(RateStore),
    CustomerPurchasesByStore(CustomerQuery),
}

impl Request {
    /// Get the role this request is sent under
    pub fn role(&self) -> Role {
        match self {
            Request::AddStore(_) => Role::AddStore,
            Request::FindStore(_) => Role::FindStore,
            Request::FindProduct(_) => Role::FindProduct,
            Request::FindProductHiddenAware(_) => Role::FindProductHiddenAware,
            Request::IncreaseQuantity(_) => Role::IncreaseQuantity,
            Request::NewProduct(_) => Role::NewProduct,
            Request::RemoveProduct(_) => Role::RemoveProduct,
            Request::DecreaseQuantity(_) => Role::DecreaseQuantity,
            Request::SalesByStoreCategory(_) => Role::SalesByStoreCategory,
            Request::SalesByProductCategory(_) => Role::SalesByProductCategory,
            Request::GeoSearch(_) => Role::GeoSearch,
            Request::FilteredSearch(_) => Role::FilteredSearch,
            Request::FetchProducts(_) => Role::FetchProducts,
            Request::Purchase(_) => Role::Purchase,
            Request::Rate(_) => Role::Rate,
            Request::CustomerPurchasesByStore(_) => Role::CustomerPurchasesByStore,
        }
    }
}
