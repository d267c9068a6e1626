//! Catalog Module
//!
//! The in-memory partition of the store catalog held by one worker.
//!
//! ## Responsibilities
//! - Store, product, and purchase records
//! - Case-insensitive lookup by store name
//! - Per-shard locking so unrelated stores are served concurrently
//! - Consistent whole-catalog scans for geo search and aggregation
//!
//! ## Data Structure Choice
//! Stores are spread over N shards by hashing the lower-cased name. Each
//! shard is a `parking_lot::RwLock` around an append-only record list plus
//! a name index:
//! - Single-store handlers lock exactly one shard
//! - Scans read-lock every shard in ascending order and hold them together
//! - Records carry a catalog-wide sequence number so scans replay insertion order

mod model;
mod outcome;
mod table;

pub use model::{
    normalize, same_name, PriceCategory, Product, ProductStatus, Purchase, PurchaseLine, Store,
    DIAGNOSTIC_STORE_NAME, HIDDEN_QUANTITY,
};
pub use outcome::{Ack, Presence, ProductLookup, PurchaseOutcome};
pub use table::Catalog;
