//! Configuration for storekeep
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WorkerError};
use crate::geo::DistanceMetric;

/// Main configuration for a worker instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of pool threads serving connections
    pub worker_threads: usize,

    /// Accepted connections allowed to wait for a pool thread.
    /// Connections beyond this are answered with an overloaded status.
    pub queue_capacity: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Catalog Configuration
    // -------------------------------------------------------------------------
    /// Number of independently locked catalog shards
    pub shard_count: usize,

    /// Distance formula used by the geo filters
    pub distance_metric: DistanceMetric,

    /// How the store-category sales aggregation accumulates
    pub sales_tally: SalesTally,

    /// Append the diagnostic sentinel store to geo search results
    pub diagnostic_sentinel: bool,
}

/// Accumulation mode for the store-category sales aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SalesTally {
    /// Running total carried from one matching store to the next, in
    /// insertion order. Matches what existing masters receive today.
    #[default]
    Cumulative,

    /// Each store reports only its own units sold
    PerStore,
}

impl fmt::Display for SalesTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalesTally::Cumulative => f.write_str("cumulative"),
            SalesTally::PerStore => f.write_str("per-store"),
        }
    }
}

impl FromStr for SalesTally {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cumulative" => Ok(SalesTally::Cumulative),
            "per-store" => Ok(SalesTally::PerStore),
            other => Err(format!("unknown sales tally '{other}' (expected cumulative or per-store)")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:7070".to_string(),
            worker_threads: 8,
            queue_capacity: 64,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            shard_count: 16,
            distance_metric: DistanceMetric::Planar,
            sales_tally: SalesTally::Cumulative,
            diagnostic_sentinel: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the pool, queue, and catalog sizes are usable
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(WorkerError::Config("worker_threads must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(WorkerError::Config("queue_capacity must be at least 1".to_string()));
        }
        if self.shard_count == 0 {
            return Err(WorkerError::Config("shard_count must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of pool threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the connection queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the number of catalog shards
    pub fn shard_count(mut self, count: usize) -> Self {
        self.config.shard_count = count;
        self
    }

    /// Set the distance formula for geo filters
    pub fn distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.config.distance_metric = metric;
        self
    }

    /// Set the store-category sales accumulation mode
    pub fn sales_tally(mut self, tally: SalesTally) -> Self {
        self.config.sales_tally = tally;
        self
    }

    /// Enable or disable the diagnostic sentinel in geo results
    pub fn diagnostic_sentinel(mut self, enabled: bool) -> Self {
        self.config.diagnostic_sentinel = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
