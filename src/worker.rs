//! Worker Module
//!
//! The operation handlers over the catalog.
//!
//! ## Responsibilities
//! - Route each request to exactly one handler
//! - Keep every handler's read-modify-write inside one critical section
//! - Report missing stores and products as sentinel values, never as errors

mod purchase;

use std::collections::BTreeMap;

use crate::catalog::{
    same_name, Ack, Catalog, Presence, Product, ProductLookup, Purchase, PurchaseOutcome, Store,
    HIDDEN_QUANTITY,
};
use crate::config::{Config, SalesTally};
use crate::error::Result;
use crate::protocol::{FilterQuery, GeoQuery, Reply, Request};

/// A catalog partition plus the handlers that serve it
///
/// ## Concurrency Model
///
/// - **Single-store handlers** take the store's shard lock once: read lock for
///   queries, write lock for mutations, purchases, and ratings. A purchase
///   validates and applies under the same write guard, so no other handler can
///   see half of it.
/// - **Scans** (geo search, sales aggregation) hold every shard's read lock for
///   the whole pass.
/// - Handlers never block except on those locks.
pub struct Worker {
    config: Config,
    catalog: Catalog,
}

impl Worker {
    /// Create a worker with an empty catalog
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let catalog = Catalog::new(config.shard_count);

        tracing::debug!(
            shards = config.shard_count,
            metric = %config.distance_metric,
            tally = %config.sales_tally,
            "Worker catalog initialized"
        );

        Ok(Self { config, catalog })
    }

    /// Execute a request
    ///
    /// Routes requests to the matching handler
    pub fn execute(&self, request: Request) -> Reply {
        match request {
            Request::AddStore(body) => Reply::AddStore(self.add_store(body.store)),
            Request::FindStore(body) => Reply::FindStore(self.find_store(&body.store_name)),
            Request::FindProduct(body) => {
                Reply::FindProduct(self.find_product(&body.store_name, &body.product_name))
            }
            Request::FindProductHiddenAware(body) => Reply::FindProductHiddenAware(
                self.find_product_hidden_aware(&body.store_name, &body.product_name),
            ),
            Request::IncreaseQuantity(body) => Reply::IncreaseQuantity(self.increase_quantity(
                &body.store_name,
                &body.product_name,
                body.amount,
            )),
            Request::NewProduct(body) => Reply::NewProduct(self.add_product(&body.store_name, body.product)),
            Request::RemoveProduct(body) => {
                Reply::RemoveProduct(self.remove_product(&body.store_name, &body.product_name))
            }
            Request::DecreaseQuantity(body) => Reply::DecreaseQuantity(self.decrease_quantity(
                &body.store_name,
                &body.product_name,
                body.amount,
            )),
            Request::SalesByStoreCategory(body) => {
                Reply::SalesByStoreCategory(self.sales_by_store_category(&body.category))
            }
            Request::SalesByProductCategory(body) => {
                Reply::SalesByProductCategory(self.sales_by_product_category(&body.category))
            }
            Request::GeoSearch(query) => {
                let stores = self.geo_search(&query);
                Reply::GeoSearch {
                    request_id: query.request_id,
                    stores,
                }
            }
            Request::FilteredSearch(query) => {
                let stores = self.filtered_search(&query);
                Reply::FilteredSearch {
                    request_id: query.request_id,
                    stores,
                }
            }
            Request::FetchProducts(body) => Reply::FetchProducts {
                products: self.fetch_products(&body.store_name),
                request_id: body.request_id,
            },
            Request::Purchase(order) => Reply::Purchase {
                outcome: self.purchase(&order.store_name, order.purchase),
                request_id: order.request_id,
            },
            Request::Rate(body) => Reply::Rate {
                ack: self.rate(&body.store_name, body.rating),
                request_id: body.request_id,
            },
            Request::CustomerPurchasesByStore(body) => Reply::CustomerPurchasesByStore(
                self.customer_purchases_at_store(&body.customer_name, &body.store_name),
            ),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Echo the requested name if a store with that name exists
    pub fn find_store(&self, store_name: &str) -> Option<String> {
        self.catalog.read_store(store_name, |_| store_name.to_string())
    }

    pub fn find_product(&self, store_name: &str, product_name: &str) -> Presence {
        self.catalog
            .read_store(store_name, |store| store.product(product_name).is_some())
            .unwrap_or(false)
            .into()
    }

    /// Like `find_product`, but reports removed products as hidden
    pub fn find_product_hidden_aware(&self, store_name: &str, product_name: &str) -> Option<ProductLookup> {
        self.catalog
            .read_store(store_name, |store| {
                store.product(product_name).map(|product| {
                    if product.quantity == HIDDEN_QUANTITY {
                        ProductLookup::Hidden
                    } else {
                        ProductLookup::Visible(product_name.to_string())
                    }
                })
            })
            .flatten()
    }

    /// Products currently on sale. Unknown stores have none.
    pub fn fetch_products(&self, store_name: &str) -> Vec<Product> {
        self.catalog
            .read_store(store_name, |store| {
                store.products.iter().filter(|p| p.is_visible()).cloned().collect()
            })
            .unwrap_or_default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a store without checking for an existing one of the same name
    ///
    /// Products are normalized and the purchase log starts empty: sales are
    /// only ever recorded by this worker's purchase handler.
    pub fn add_store(&self, mut store: Store) -> Ack {
        tracing::debug!(store = %store.name, "Adding store");
        store.products = store.products.into_iter().map(Product::normalized).collect();
        if !store.purchases.is_empty() {
            tracing::debug!(
                store = %store.name,
                dropped = store.purchases.len(),
                "Ignoring purchase log sent with new store"
            );
            store.purchases.clear();
        }
        self.catalog.insert(store);
        Ack::StoreAdded
    }

    pub fn add_product(&self, store_name: &str, product: Product) -> Ack {
        let product = product.normalized();
        self.catalog
            .write_store(store_name, |store| {
                tracing::debug!(store = %store.name, product = %product.name, "Adding product");
                store.products.push(product);
                Ack::ProductAdded
            })
            .unwrap_or(Ack::StoreNotFound)
    }

    /// Add stock. Removed products stay removed.
    pub fn increase_quantity(&self, store_name: &str, product_name: &str, amount: u32) -> Ack {
        self.catalog
            .write_store(store_name, |store| match store.product_mut(product_name) {
                Some(product) => {
                    if !product.is_removed() {
                        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
                        product.quantity = product.quantity.saturating_add(amount);
                    }
                    Ack::AmountChanged
                }
                None => Ack::ProductNotFound,
            })
            .unwrap_or(Ack::ProductNotFound)
    }

    /// Remove stock, refusing to go below zero
    pub fn decrease_quantity(&self, store_name: &str, product_name: &str, amount: u32) -> Ack {
        self.catalog
            .write_store(store_name, |store| match store.product_mut(product_name) {
                Some(product) => {
                    let remaining = i64::from(product.quantity) - i64::from(amount);
                    match i32::try_from(remaining) {
                        Ok(quantity) if quantity >= 0 => {
                            product.quantity = quantity;
                            Ack::AmountChanged
                        }
                        _ => Ack::AmountExceedsQuantity,
                    }
                }
                None => Ack::ProductNotFound,
            })
            .unwrap_or(Ack::ProductNotFound)
    }

    /// Soft delete; repeating it is harmless
    pub fn remove_product(&self, store_name: &str, product_name: &str) -> Ack {
        self.catalog
            .write_store(store_name, |store| {
                if let Some(product) = store.product_mut(product_name) {
                    product.hide();
                }
                Ack::ProductRemoved
            })
            .unwrap_or(Ack::ProductNotFound)
    }

    /// Fold a rating into the store's running average. Values are not range-checked.
    pub fn rate(&self, store_name: &str, rating: i32) -> Ack {
        self.catalog
            .write_store(store_name, |store| {
                store.record_rating(rating);
                Ack::RatingSubmitted
            })
            .unwrap_or(Ack::StoreNotFound)
    }

    /// All-or-nothing purchase against one store
    pub fn purchase(&self, store_name: &str, purchase: Purchase) -> PurchaseOutcome {
        let outcome = self
            .catalog
            .write_store(store_name, |store| purchase::settle(store, purchase))
            .unwrap_or(PurchaseOutcome::StoreNotFound);

        tracing::debug!(store = store_name, outcome = %outcome, "Purchase settled");
        outcome
    }

    // =========================================================================
    // Geo filters
    // =========================================================================

    /// Stores within `radius` of the query point, without their purchase logs
    pub fn geo_search(&self, query: &GeoQuery) -> Vec<Store> {
        let mut stores = Vec::new();
        self.catalog.scan(|store| {
            if self.within(store, query.latitude, query.longitude, query.radius) {
                stores.push(store.listing());
            }
        });
        self.with_sentinel(stores)
    }

    /// Stores passing the distance, category, stars, and price-band filters
    pub fn filtered_search(&self, query: &FilterQuery) -> Vec<Store> {
        let mut stores = Vec::new();
        self.catalog.scan(|store| {
            let matches_distance = self.within(store, query.latitude, query.longitude, query.radius);
            let matches_category = query.categories.is_empty() || query.categories.contains(&store.category);
            let matches_stars = query.min_stars == 0.0 || store.stars >= query.min_stars;
            let matches_price = query.price_category.is_empty()
                || same_name(store.price_category().as_str(), &query.price_category);

            if matches_distance && matches_category && matches_stars && matches_price {
                stores.push(store.listing());
            }
        });
        self.with_sentinel(stores)
    }

    fn within(&self, store: &Store, latitude: f64, longitude: f64, radius: f64) -> bool {
        let distance = self
            .config
            .distance_metric
            .distance(latitude, longitude, store.latitude, store.longitude);
        distance <= radius
    }

    fn with_sentinel(&self, mut stores: Vec<Store>) -> Vec<Store> {
        if self.config.diagnostic_sentinel {
            stores.push(Store::diagnostic());
        }
        stores
    }

    // =========================================================================
    // Aggregations
    // =========================================================================

    /// Units sold per store of the given store category
    ///
    /// Under `SalesTally::Cumulative` each entry is a running total over the
    /// matching stores seen so far in insertion order, not that store's own sales.
    pub fn sales_by_store_category(&self, store_category: &str) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        let mut running = 0u64;

        self.catalog.scan(|store| {
            if !same_name(&store.category, store_category) {
                return;
            }
            let sold = store.units_sold();
            let total = match self.config.sales_tally {
                SalesTally::Cumulative => {
                    running += sold;
                    running
                }
                SalesTally::PerStore => sold,
            };
            totals.insert(store.name.clone(), total);
        });
        totals
    }

    /// Units sold in a product category, for stores that sold any
    pub fn sales_by_product_category(&self, product_category: &str) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        self.catalog.scan(|store| {
            let sold = store.units_sold_in(product_category);
            if sold > 0 {
                totals.insert(store.name.clone(), sold);
            }
        });
        totals
    }

    /// Product name -> units one customer bought at one store
    pub fn customer_purchases_at_store(&self, customer_name: &str, store_name: &str) -> BTreeMap<String, u64> {
        self.catalog
            .read_store(store_name, |store| store.purchases_by(customer_name))
            .unwrap_or_default()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Copy of the named store as it is right now
    pub fn snapshot(&self, store_name: &str) -> Option<Store> {
        self.catalog.read_store(store_name, Store::clone)
    }

    /// Number of store records held
    pub fn store_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
