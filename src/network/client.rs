//! Master-side client
//!
//! Performs one request/response exchange per call, each on a fresh
//! connection, the way the master talks to workers.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{Result, WorkerError};
use crate::protocol::{read_response, write_request, Reply, Request};

/// Client for a single worker
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: None,
        }
    }

    /// Bound both reads and writes of each exchange
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send one request and wait for its reply
    ///
    /// ERROR and OVERLOADED frames come back as `WorkerError::Remote` and
    /// `WorkerError::Overloaded`.
    pub fn call(&self, request: &Request) -> Result<Reply> {
        let stream = TcpStream::connect(&self.addr)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        let mut writer = BufWriter::new(stream.try_clone()?);
        write_request(&mut writer, request)?;

        let mut reader = BufReader::new(stream);
        let reply = read_response(&mut reader)?.into_reply()?;

        if reply.role() != request.role() {
            return Err(WorkerError::Protocol(format!(
                "Sent {} but received a {} reply",
                request.role(),
                reply.role()
            )));
        }
        Ok(reply)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}
