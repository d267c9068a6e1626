//! # storekeep
//!
//! A catalog worker node for a master-worker store search and ordering service:
//! - In-memory partition of the store catalog
//! - Sharded catalog with per-shard reader/writer locks
//! - All-or-nothing purchase transactions
//! - Bounded worker pool with explicit backpressure
//! - One request per TCP connection from the master
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │           (acceptor + bounded queue + pool threads)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one connection = one request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Dispatcher                        │
//! │          (role tag → typed body → handler → reply)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Worker                                 │
//! │   queries · mutations · geo filters · aggregations · purchase│
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Shard 0   │   ...    │   Shard N   │
//!   │  (RwLock)   │          │  (RwLock)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod catalog;
pub mod geo;
pub mod network;
pub mod protocol;
pub mod worker;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, SalesTally};
pub use error::{Result, WorkerError};
pub use geo::DistanceMetric;
pub use worker::Worker;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of storekeep
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
