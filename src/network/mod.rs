//! Network Module
//!
//! TCP server, connection handling, and the master-side client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Bounded pool of threads fed by a bounded queue
//! - One request per connection, routed through the Worker

mod client;
mod connection;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use server::{Server, ServerHandle, ShutdownHandle};
