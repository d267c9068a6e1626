//! Codec Tests
//!
//! Tests for request framing, role tags, and response encoding/decoding.

use std::collections::BTreeMap;
use std::io::Cursor;

use storekeep::catalog::{Ack, Product, Purchase, PurchaseLine, PurchaseOutcome, Store};
use storekeep::protocol::{
    decode_response, encode_frame, encode_response, read_frame, read_request, read_response,
    read_role, write_frame, write_request, write_response, AddStore, FilterQuery, FindStore,
    PurchaseOrder, QuantityChange, Reply, Request, Response, Role, Status, FRAME_HEADER_SIZE,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
use storekeep::WorkerError;

// =============================================================================
// Helper Functions
// =============================================================================

fn through_wire(request: &Request) -> Request {
    let mut buffer = Vec::new();
    write_request(&mut buffer, request).unwrap();
    read_request(&mut Cursor::new(buffer)).unwrap()
}

/// Tag frame with an arbitrary tag, followed by a raw body frame
fn raw_request(tag: &str, body: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::new();
    write_frame(&mut buffer, tag.as_bytes()).unwrap();
    write_frame(&mut buffer, body).unwrap();
    buffer
}

// =============================================================================
// Frame Tests
// =============================================================================

#[test]
fn test_frame_layout() {
    let frame = encode_frame(b"find-store").unwrap();

    assert_eq!(frame.len(), FRAME_HEADER_SIZE + 10);
    assert_eq!(&frame[..4], &[0, 0, 0, 10]);
    assert_eq!(&frame[4..], b"find-store");
}

#[test]
fn test_empty_frame() {
    let frame = encode_frame(b"").unwrap();
    assert_eq!(&frame[..], &[0, 0, 0, 0]);

    let payload = read_frame(&mut Cursor::new(frame.to_vec())).unwrap();
    assert!(payload.is_empty());
}

#[test]
fn test_read_frame_rejects_oversize_length() {
    let header = (MAX_PAYLOAD_SIZE + 1).to_be_bytes().to_vec();

    match read_frame(&mut Cursor::new(header)) {
        Err(WorkerError::Protocol(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_read_frame_truncated_payload() {
    let mut bytes = 8u32.to_be_bytes().to_vec();
    bytes.extend_from_slice(b"abc");

    match read_frame(&mut Cursor::new(bytes)) {
        Err(WorkerError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

// =============================================================================
// Request Tests
// =============================================================================

#[test]
fn test_request_wire_starts_with_canonical_tag() {
    let request = Request::FindStore(FindStore {
        store_name: "Pizza Fun".to_string(),
    });
    let mut buffer = Vec::new();
    write_request(&mut buffer, &request).unwrap();

    let tag = read_frame(&mut Cursor::new(buffer)).unwrap();
    assert_eq!(tag, b"find-store");
}

#[test]
fn test_request_add_store_through_wire() {
    let store = Store::new("Pizza Fun", 37.98, 23.72, "pizzeria")
        .with_rating(4.5, 12)
        .with_image("pizza.png")
        .with_products(vec![Product::new("Margherita", "pizza", 8.0, 5)]);
    let request = Request::AddStore(AddStore { store });

    assert_eq!(through_wire(&request), request);
}

#[test]
fn test_request_purchase_through_wire() {
    let request = Request::Purchase(PurchaseOrder {
        request_id: "order-1".to_string(),
        purchase: Purchase::new("alice", vec![PurchaseLine::new("Margherita", 2)]),
        store_name: "Pizza Fun".to_string(),
    });

    assert_eq!(through_wire(&request), request);
}

#[test]
fn test_request_filter_through_wire() {
    let request = Request::FilteredSearch(FilterQuery {
        request_id: "req".to_string(),
        latitude: 37.98,
        longitude: 23.72,
        radius: 5.0,
        categories: vec!["pizzeria".to_string(), "sushi".to_string()],
        min_stars: 3.5,
        price_category: "$$".to_string(),
    });

    assert_eq!(through_wire(&request), request);
}

#[test]
fn test_shared_body_roles_keep_their_role() {
    // Increase and decrease share a body shape; the tag decides the role
    let change = QuantityChange {
        store_name: "Pizza Fun".to_string(),
        product_name: "Cola".to_string(),
        amount: 3,
    };

    let decoded = through_wire(&Request::DecreaseQuantity(change.clone()));
    assert_eq!(decoded.role(), Role::DecreaseQuantity);

    let decoded = through_wire(&Request::IncreaseQuantity(change));
    assert_eq!(decoded.role(), Role::IncreaseQuantity);
}

#[test]
fn test_legacy_tag_accepted() {
    let body = bincode::serialize(&FindStore {
        store_name: "Pizza Fun".to_string(),
    })
    .unwrap();
    let bytes = raw_request("findStore", &body);

    let request = read_request(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(
        request,
        Request::FindStore(FindStore {
            store_name: "Pizza Fun".to_string()
        })
    );
}

#[test]
fn test_every_tag_parses_back() {
    for role in Role::ALL {
        for tag in [role.tag(), role.legacy_tag()] {
            let mut bytes = Vec::new();
            write_frame(&mut bytes, tag.as_bytes()).unwrap();
            assert_eq!(read_role(&mut Cursor::new(bytes)).unwrap(), role, "tag {}", tag);
        }
    }
}

#[test]
fn test_unknown_role() {
    let bytes = raw_request("teleport", b"");

    match read_request(&mut Cursor::new(bytes)) {
        Err(WorkerError::UnknownRole(tag)) => assert_eq!(tag, "teleport"),
        other => panic!("Expected unknown role, got {:?}", other),
    }
}

#[test]
fn test_non_utf8_tag() {
    let mut bytes = Vec::new();
    write_frame(&mut bytes, &[0xff, 0xfe]).unwrap();

    match read_role(&mut Cursor::new(bytes)) {
        Err(WorkerError::Protocol(msg)) => assert!(msg.contains("UTF-8")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_malformed_body() {
    // A FindStore body needs a length-prefixed string; two bytes is not one
    let bytes = raw_request("find-store", &[1, 2]);

    match read_request(&mut Cursor::new(bytes)) {
        Err(WorkerError::Serialization(_)) => {}
        other => panic!("Expected serialization error, got {:?}", other),
    }
}

#[test]
fn test_missing_body_frame() {
    let mut bytes = Vec::new();
    write_frame(&mut bytes, b"find-store").unwrap();

    match read_request(&mut Cursor::new(bytes)) {
        Err(WorkerError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("Expected EOF, got {:?}", other),
    }
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_encode_decode_ok_response() {
    let reply = Reply::DecreaseQuantity(Ack::AmountExceedsQuantity);
    let response = Response::ok(&reply).unwrap();

    let encoded = encode_response(&response).unwrap();
    assert_eq!(encoded[0], Status::Ok as u8);

    let decoded = decode_response(&encoded).unwrap();
    assert_eq!(decoded, response);
    assert_eq!(decoded.into_reply().unwrap(), reply);
}

#[test]
fn test_response_header_layout() {
    let response = Response::error("unknown role: teleport");
    let encoded = encode_response(&response).unwrap();

    assert_eq!(encoded.len(), HEADER_SIZE + 22);
    assert_eq!(encoded[0], 0x02);
    assert_eq!(&encoded[1..5], &[0, 0, 0, 22]);
    assert_eq!(&encoded[5..], b"unknown role: teleport");
}

#[test]
fn test_error_response_becomes_remote_error() {
    let response = Response::error("unknown role: teleport");

    match response.into_reply() {
        Err(WorkerError::Remote(msg)) => assert_eq!(msg, "unknown role: teleport"),
        other => panic!("Expected remote error, got {:?}", other),
    }
}

#[test]
fn test_overloaded_response() {
    let response = Response::overloaded("worker busy");
    let encoded = encode_response(&response).unwrap();
    assert_eq!(encoded[0], 0x03);

    match decode_response(&encoded).unwrap().into_reply() {
        Err(WorkerError::Overloaded(msg)) => assert_eq!(msg, "worker busy"),
        other => panic!("Expected overloaded error, got {:?}", other),
    }
}

#[test]
fn test_decode_response_short_header() {
    assert!(matches!(
        decode_response(&[0x00, 0, 0]),
        Err(WorkerError::Protocol(_))
    ));
}

#[test]
fn test_decode_response_unknown_status() {
    let bytes = [0x01, 0, 0, 0, 0];
    match decode_response(&bytes) {
        Err(WorkerError::Protocol(msg)) => assert!(msg.contains("0x01")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_decode_response_short_payload() {
    let bytes = [0x00, 0, 0, 0, 10, 1, 2, 3];
    assert!(matches!(decode_response(&bytes), Err(WorkerError::Protocol(_))));
}

#[test]
fn test_response_stream_io() {
    let mut totals = BTreeMap::new();
    totals.insert("Pizza Fun".to_string(), 6);
    totals.insert("Slice House".to_string(), 10);
    let replies = vec![
        Reply::SalesByStoreCategory(totals),
        Reply::Purchase {
            request_id: "order-1".to_string(),
            outcome: PurchaseOutcome::InsufficientQuantity("Cola".to_string()),
        },
        Reply::FindStore(None),
    ];

    let mut buffer = Vec::new();
    for reply in &replies {
        write_response(&mut buffer, &Response::ok(reply).unwrap()).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for reply in replies {
        let response = read_response(&mut cursor).unwrap();
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.into_reply().unwrap(), reply);
    }
}
