//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! ┌──────────┬─────────────────┐┌──────────┬─────────────────────────────┐
//! │ Len (4)  │  Role tag (utf8) ││ Len (4)  │   Body (bincode, per role)  │
//! └──────────┴─────────────────┘└──────────┴─────────────────────────────┘
//! ```
//!
//! ### Response
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::request::Request;
use super::{Response, Role, Status};
use crate::error::{Result, WorkerError};

/// Length prefix size for request frames
pub const FRAME_HEADER_SIZE: usize = 4;

/// Header size for responses: 1 byte status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum frame payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Frames
// =============================================================================

/// Encode a length-prefixed frame
pub fn encode_frame(payload: &[u8]) -> Result<Bytes> {
    let len = checked_len(payload.len())?;
    let mut frame = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.put_u32(len);
    frame.put_slice(payload);
    Ok(frame.freeze())
}

/// Write one length-prefixed frame (not flushed)
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    writer.write_all(&encode_frame(payload)?)?;
    Ok(())
}

/// Read one length-prefixed frame
///
/// Blocks until the whole frame is received or an error occurs
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = u32::from_be_bytes(header);
    if len > MAX_PAYLOAD_SIZE {
        return Err(WorkerError::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

fn checked_len(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(len),
        _ => Err(WorkerError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        ))),
    }
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode the body frame contents for a request
pub fn encode_request_body(request: &Request) -> Result<Vec<u8>> {
    let body = match request {
        Request::AddStore(body) => encode_body(body)?,
        Request::FindStore(body) => encode_body(body)?,
        Request::FindProduct(body)
        | Request::FindProductHiddenAware(body)
        | Request::RemoveProduct(body) => encode_body(body)?,
        Request::IncreaseQuantity(body) | Request::DecreaseQuantity(body) => encode_body(body)?,
        Request::NewProduct(body) => encode_body(body)?,
        Request::SalesByStoreCategory(body) | Request::SalesByProductCategory(body) => encode_body(body)?,
        Request::GeoSearch(body) => encode_body(body)?,
        Request::FilteredSearch(body) => encode_body(body)?,
        Request::FetchProducts(body) => encode_body(body)?,
        Request::Purchase(body) => encode_body(body)?,
        Request::Rate(body) => encode_body(body)?,
        Request::CustomerPurchasesByStore(body) => encode_body(body)?,
    };
    Ok(body)
}

/// Decode a body frame under the schema of `role`
pub fn decode_request_body(role: Role, body: &[u8]) -> Result<Request> {
    let request = match role {
        Role::AddStore => Request::AddStore(decode_body(body)?),
        Role::FindStore => Request::FindStore(decode_body(body)?),
        Role::FindProduct => Request::FindProduct(decode_body(body)?),
        Role::FindProductHiddenAware => Request::FindProductHiddenAware(decode_body(body)?),
        Role::IncreaseQuantity => Request::IncreaseQuantity(decode_body(body)?),
        Role::NewProduct => Request::NewProduct(decode_body(body)?),
        Role::RemoveProduct => Request::RemoveProduct(decode_body(body)?),
        Role::DecreaseQuantity => Request::DecreaseQuantity(decode_body(body)?),
        Role::SalesByStoreCategory => Request::SalesByStoreCategory(decode_body(body)?),
        Role::SalesByProductCategory => Request::SalesByProductCategory(decode_body(body)?),
        Role::GeoSearch => Request::GeoSearch(decode_body(body)?),
        Role::FilteredSearch => Request::FilteredSearch(decode_body(body)?),
        Role::FetchProducts => Request::FetchProducts(decode_body(body)?),
        Role::Purchase => Request::Purchase(decode_body(body)?),
        Role::Rate => Request::Rate(decode_body(body)?),
        Role::CustomerPurchasesByStore => Request::CustomerPurchasesByStore(decode_body(body)?),
    };
    Ok(request)
}

fn encode_body<T: Serialize>(body: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(body)?)
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(body)?)
}

/// Write a request: role tag frame, then body frame
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    write_frame(writer, request.role().tag().as_bytes())?;
    write_frame(writer, &encode_request_body(request)?)?;
    writer.flush()?;
    Ok(())
}

/// Read the role tag frame
///
/// An unrecognized tag yields `WorkerError::UnknownRole` with the tag text
pub fn read_role<R: Read>(reader: &mut R) -> Result<Role> {
    let tag = read_frame(reader)?;
    let tag = String::from_utf8(tag)
        .map_err(|e| WorkerError::Protocol(format!("Role tag is not valid UTF-8: {}", e)))?;
    tag.parse()
}

/// Read a complete request from a stream
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let role = read_role(reader)?;
    let body = read_frame(reader)?;
    decode_request_body(role, &body)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Result<Bytes> {
    let len = checked_len(response.payload.len())?;
    let mut message = BytesMut::with_capacity(HEADER_SIZE + response.payload.len());
    message.put_u8(response.status as u8);
    message.put_u32(len);
    message.put_slice(&response.payload);
    Ok(message.freeze())
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    if bytes.len() < HEADER_SIZE {
        return Err(WorkerError::Protocol(format!(
            "Incomplete response header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let status = decode_status(bytes[0])?;
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(WorkerError::Protocol(format!(
            "Response payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(WorkerError::Protocol(format!(
            "Incomplete response payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    Ok(Response {
        status,
        payload: bytes[HEADER_SIZE..total_len].to_vec(),
    })
}

fn decode_status(byte: u8) -> Result<Status> {
    match byte {
        0x00 => Ok(Status::Ok),
        0x02 => Ok(Status::Error),
        0x03 => Ok(Status::Overloaded),
        _ => Err(WorkerError::Protocol(format!(
            "Unknown response status: 0x{:02x}",
            byte
        ))),
    }
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let status = decode_status(header[0])?;
    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(WorkerError::Protocol(format!(
            "Response payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut payload = vec![0u8; payload_len as usize];
    reader.read_exact(&mut payload)?;

    Ok(Response { status, payload })
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response)?)?;
    writer.flush()?;
    Ok(())
}
