//! Handler outcomes
//!
//! Typed results of catalog operations. Each `Display` impl renders the
//! message text masters show to users, so the text is part of the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by mutation and rating handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ack {
    StoreAdded,
    ProductAdded,
    AmountChanged,
    /// Decrease rejected, quantity untouched
    AmountExceedsQuantity,
    ProductRemoved,
    RatingSubmitted,
    ProductNotFound,
    StoreNotFound,
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Ack::StoreAdded => "Store added successfully",
            Ack::ProductAdded => "Product added successfully",
            Ack::AmountChanged => "Amount changed successfully",
            Ack::AmountExceedsQuantity => "Amount is greater than the quantity",
            Ack::ProductRemoved => "Product removed or updated successfully.",
            Ack::RatingSubmitted => "Rating submitted successfully.",
            Ack::ProductNotFound => "Product not found.",
            Ack::StoreNotFound => "Store not found.",
        };
        f.write_str(message)
    }
}

/// Plain existence check for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Exists,
    Missing,
}

impl From<bool> for Presence {
    fn from(found: bool) -> Self {
        if found {
            Presence::Exists
        } else {
            Presence::Missing
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Exists => f.write_str("exists"),
            Presence::Missing => f.write_str("doesnt exist"),
        }
    }
}

/// Existence check that distinguishes removed products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductLookup {
    /// Carries the product name as requested
    Visible(String),
    Hidden,
}

impl fmt::Display for ProductLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductLookup::Visible(name) => f.write_str(name),
            ProductLookup::Hidden => f.write_str("hidden"),
        }
    }
}

/// Result of a purchase transaction
///
/// Every variant other than `Completed` guarantees the store was not touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOutcome {
    Completed { store_name: String },
    Empty,
    ProductNotFound(String),
    ProductUnavailable(String),
    InsufficientQuantity(String),
    StoreNotFound,
}

impl PurchaseOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PurchaseOutcome::Completed { .. })
    }
}

impl fmt::Display for PurchaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseOutcome::Completed { store_name } => write!(f, "Purchase successful at {store_name}"),
            PurchaseOutcome::Empty => f.write_str("The purchase requested is empty"),
            PurchaseOutcome::ProductNotFound(name) => write!(f, "Product not found: {name}"),
            PurchaseOutcome::ProductUnavailable(name) => write!(f, "Product not available: {name}"),
            PurchaseOutcome::InsufficientQuantity(name) => write!(f, "Not enough quantity for: {name}"),
            // Masters have always received an empty message for an unknown store
            PurchaseOutcome::StoreNotFound => Ok(()),
        }
    }
}
