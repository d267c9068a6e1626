//! Error types for storekeep
//!
//! Provides a unified error type for all operations.
//!
//! Catalog lookups never fail with an error: missing stores and products are
//! reported as sentinel values inside the normal reply. Errors here are
//! transport, framing, and configuration faults.

use thiserror::Error;

/// Result type alias using WorkerError
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Unified error type for storekeep operations
#[derive(Debug, Error)]
pub enum WorkerError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The worker answered with an error status frame
    #[error("Worker rejected request: {0}")]
    Remote(String),

    /// The worker's connection queue was full
    #[error("Worker overloaded: {0}")]
    Overloaded(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
