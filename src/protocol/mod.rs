//! Protocol Module
//!
//! Defines the wire protocol between the master and a worker.
//!
//! ## Exchange
//! One connection carries exactly one request and one response:
//! 1. Master sends the role tag frame
//! 2. Master sends the role's body frame
//! 3. Worker sends one response frame and closes the connection
//!
//! ## Request Frames
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```
//! The first payload is the UTF-8 role tag, the second the bincode body.
//!
//! ## Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK (payload is the bincode reply)
//! - 0x02: ERROR (payload is a message, e.g. unknown role)
//! - 0x03: OVERLOADED (payload is a message)

mod codec;
mod request;
mod response;
mod role;

pub use codec::{
    decode_request_body, decode_response, encode_frame, encode_request_body, encode_response,
    read_frame, read_request, read_response, read_role, write_frame, write_request, write_response,
    FRAME_HEADER_SIZE, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use request::{
    AddStore, CategoryQuery, CustomerQuery, FetchProducts, FilterQuery, FindStore, GeoQuery,
    NewProduct, ProductRef, PurchaseOrder, QuantityChange, RateStore, Request,
};
pub use response::{Reply, Response, Status};
pub use role::Role;
