//! Response definitions
//!
//! Represents responses to the master.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Role;
use crate::catalog::{Ack, Presence, Product, ProductLookup, PurchaseOutcome, Store};
use crate::error::{Result, WorkerError};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    Error = 0x02,
    Overloaded = 0x03,
}

/// A response frame
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Encoded [`Reply`] for OK, message text otherwise
    pub payload: Vec<u8>,
}

impl Response {
    /// Create an OK response carrying a reply
    pub fn ok(reply: &Reply) -> Result<Self> {
        Ok(Self {
            status: Status::Ok,
            payload: bincode::serialize(reply)?,
        })
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: message.as_bytes().to_vec(),
        }
    }

    /// Create an OVERLOADED response
    pub fn overloaded(message: &str) -> Self {
        Self {
            status: Status::Overloaded,
            payload: message.as_bytes().to_vec(),
        }
    }

    /// Decode the reply, turning non-OK statuses into errors
    pub fn into_reply(self) -> Result<Reply> {
        match self.status {
            Status::Ok => Ok(bincode::deserialize(&self.payload)?),
            Status::Error => Err(WorkerError::Remote(String::from_utf8_lossy(&self.payload).into_owned())),
            Status::Overloaded => Err(WorkerError::Overloaded(
                String::from_utf8_lossy(&self.payload).into_owned(),
            )),
        }
    }
}

/// Role-specific reply fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    AddStore(Ack),

    /// Requested name if the store exists
    FindStore(Option<String>),

    FindProduct(Presence),

    /// `None` when the store or product is absent
    FindProductHiddenAware(Option<ProductLookup>),

    IncreaseQuantity(Ack),
    NewProduct(Ack),
    RemoveProduct(Ack),
    DecreaseQuantity(Ack),

    /// Store name -> units sold
    SalesByStoreCategory(BTreeMap<String, u64>),

    /// Store name -> units sold in the product category
    SalesByProductCategory(BTreeMap<String, u64>),

    GeoSearch { request_id: String, stores: Vec<Store> },
    FilteredSearch { request_id: String, stores: Vec<Store> },
    FetchProducts { request_id: String, products: Vec<Product> },
    Purchase { request_id: String, outcome: PurchaseOutcome },
    Rate { request_id: String, ack: Ack },

    /// Product name -> units bought
    CustomerPurchasesByStore(BTreeMap<String, u64>),
}

impl Reply {
    /// Get the role this reply answers
    pub fn role(&self) -> Role {
        match self {
            Reply::AddStore(_) => Role::AddStore,
            Reply::FindStore(_) => Role::FindStore,
            Reply::FindProduct(_) => Role::FindProduct,
            Reply::FindProductHiddenAware(_) => Role::FindProductHiddenAware,
            Reply::IncreaseQuantity(_) => Role::IncreaseQuantity,
            Reply::NewProduct(_) => Role::NewProduct,
            Reply::RemoveProduct(_) => Role::RemoveProduct,
            Reply::DecreaseQuantity(_) => Role::DecreaseQuantity,
            Reply::SalesByStoreCategory(_) => Role::SalesByStoreCategory,
            Reply::SalesByProductCategory(_) => Role::SalesByProductCategory,
            Reply::GeoSearch { .. } => Role::GeoSearch,
            Reply::FilteredSearch { .. } => Role::FilteredSearch,
            Reply::FetchProducts { .. } => Role::FetchProducts,
            Reply::Purchase { .. } => Role::Purchase,
            Reply::Rate { .. } => Role::Rate,
            Reply::CustomerPurchasesByStore(_) => Role::CustomerPurchasesByStore,
        }
    }
}
