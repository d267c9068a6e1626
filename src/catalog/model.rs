//! Catalog records
//!
//! Stores, their products, and the append-only purchase log.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Quantity marking a product as removed from sale
pub const HIDDEN_QUANTITY: i32 = -1;

/// Name of the synthetic store appended to geo search results
pub const DIAGNOSTIC_STORE_NAME: &str = "DiagnosticStore_Worker";

/// Lookup key for names: store, product, and customer matching is case-insensitive
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive name comparison
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || normalize(a) == normalize(b)
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product is offered to customers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Visible,
    Hidden,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Visible => f.write_str("visible"),
            ProductStatus::Hidden => f.write_str("hidden"),
        }
    }
}

/// A product listed by a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub price: f64,

    /// Units in stock, or [`HIDDEN_QUANTITY`] once removed
    pub quantity: i32,

    pub status: ProductStatus,
}

impl Product {
    /// Create a visible product
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            status: ProductStatus::Visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.status == ProductStatus::Visible
    }

    /// True once the product carries the removal sentinel or hidden status
    pub fn is_removed(&self) -> bool {
        self.quantity == HIDDEN_QUANTITY || self.status == ProductStatus::Hidden
    }

    /// Soft delete. Repeating it leaves the same state.
    pub fn hide(&mut self) {
        self.quantity = HIDDEN_QUANTITY;
        self.status = ProductStatus::Hidden;
    }

    /// Bring a product received from a master in line with the stock rules:
    /// a hidden status or a negative quantity both mean removed.
    pub fn normalized(mut self) -> Self {
        if self.is_removed() || self.quantity < 0 {
            self.hide();
        }
        self
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// One line of a basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub product_name: String,

    /// Backfilled from the catalog when the purchase is settled
    pub category: String,

    /// Backfilled from the catalog when the purchase is settled
    pub price: f64,

    /// Units bought
    pub quantity: u32,
}

impl PurchaseLine {
    /// A requested line; category and price are filled in at settlement
    pub fn new(product_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_name: product_name.into(),
            category: String::new(),
            price: 0.0,
            quantity,
        }
    }
}

/// A completed (or requested) purchase by one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub customer_name: String,
    pub lines: Vec<PurchaseLine>,
}

impl Purchase {
    pub fn new(customer_name: impl Into<String>, lines: Vec<PurchaseLine>) -> Self {
        Self {
            customer_name: customer_name.into(),
            lines,
        }
    }
}

// =============================================================================
// Price category
// =============================================================================

/// Price band derived from a store's mean product price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceCategory {
    /// Mean price up to 5
    Low,
    /// Mean price up to 15
    Mid,
    /// Mean price above 15
    High,
}

impl PriceCategory {
    pub fn from_mean_price(mean: f64) -> Self {
        if mean <= 5.0 {
            PriceCategory::Low
        } else if mean <= 15.0 {
            PriceCategory::Mid
        } else {
            PriceCategory::High
        }
    }

    /// The dollar-sign form masters filter on
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCategory::Low => "$",
            PriceCategory::Mid => "$$",
            PriceCategory::High => "$$$",
        }
    }
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Store
// =============================================================================

/// A store and everything it sells and has sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,

    /// Running average of submitted ratings
    pub stars: f64,

    pub review_count: u32,
    pub image: String,
    pub products: Vec<Product>,

    /// Append-only
    pub purchases: Vec<Purchase>,
}

impl Store {
    /// Create a store with no rating, products, or purchases
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            category: category.into(),
            stars: 0.0,
            review_count: 0,
            image: String::new(),
            products: Vec::new(),
            purchases: Vec::new(),
        }
    }

    pub fn with_rating(mut self, stars: f64, review_count: u32) -> Self {
        self.stars = stars;
        self.review_count = review_count;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    /// The synthetic record appended to geo search results
    pub fn diagnostic() -> Self {
        Store::new(DIAGNOSTIC_STORE_NAME, 0.0, 0.0, "DIAGNOSTIC").with_image("diag.png")
    }

    /// Copy for search results: everything but the purchase log
    pub fn listing(&self) -> Self {
        Self {
            name: self.name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            category: self.category.clone(),
            stars: self.stars,
            review_count: self.review_count,
            image: self.image.clone(),
            products: self.products.clone(),
            purchases: Vec::new(),
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        self.name == DIAGNOSTIC_STORE_NAME
    }

    /// First product with a matching name
    pub fn product(&self, name: &str) -> Option<&Product> {
        let key = normalize(name);
        self.products.iter().find(|p| normalize(&p.name) == key)
    }

    /// First product with a matching name, mutably
    pub fn product_mut(&mut self, name: &str) -> Option<&mut Product> {
        let key = normalize(name);
        self.products.iter_mut().find(|p| normalize(&p.name) == key)
    }

    /// Price band over the products currently on sale
    pub fn price_category(&self) -> PriceCategory {
        let (total, count) = self
            .products
            .iter()
            .filter(|p| p.is_visible())
            .fold((0.0, 0u32), |(total, count), p| (total + p.price, count + 1));

        if count == 0 {
            return PriceCategory::Low;
        }
        PriceCategory::from_mean_price(total / f64::from(count))
    }

    /// Fold one rating into the running average
    pub fn record_rating(&mut self, rating: i32) {
        let count = f64::from(self.review_count);
        self.stars = (self.stars * count + f64::from(rating)) / (count + 1.0);
        self.review_count = self.review_count.saturating_add(1);
    }

    /// Units across every recorded purchase line
    pub fn units_sold(&self) -> u64 {
        self.purchases
            .iter()
            .flat_map(|p| &p.lines)
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Units across purchase lines whose product category matches
    pub fn units_sold_in(&self, product_category: &str) -> u64 {
        self.purchases
            .iter()
            .flat_map(|p| &p.lines)
            .filter(|line| same_name(&line.category, product_category))
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Product name -> units bought by one customer, merged across purchases
    pub fn purchases_by(&self, customer_name: &str) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        for purchase in self
            .purchases
            .iter()
            .filter(|p| same_name(&p.customer_name, customer_name))
        {
            for line in &purchase.lines {
                *totals.entry(line.product_name.clone()).or_insert(0) += u64::from(line.quantity);
            }
        }
        totals
    }
}
