//! Connection Handler
//!
//! Serves the single request/response exchange of one master connection.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, WorkerError};
use crate::protocol::{read_frame, read_request, write_response, Response, MAX_PAYLOAD_SIZE};
use crate::worker::Worker;

/// Handles a single master connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared catalog and handlers
    worker: Arc<Worker>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O on two handles to the same socket
    pub fn new(stream: TcpStream, worker: Arc<Worker>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            worker,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction unbounded)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the exchange, then drop (and so close) the connection
    ///
    /// A request that cannot be read or decoded aborts the connection
    /// without a response. An unknown role, or a reply too large to frame,
    /// gets an error frame.
    pub fn handle(mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let request = match read_request(&mut self.reader) {
            Ok(request) => request,
            Err(WorkerError::UnknownRole(tag)) => {
                tracing::warn!("Unknown role '{}' from {}", tag, self.peer_addr);
                // Consume the body frame so closing does not reset the connection
                if let Err(e) = read_frame(&mut self.reader) {
                    tracing::debug!("No body frame after unknown role from {}: {}", self.peer_addr, e);
                }
                return self.send_response(&Response::error(&format!("unknown role: {}", tag)));
            }
            Err(WorkerError::Io(ref e)) if is_hangup(e.kind()) => {
                tracing::debug!("Client {} went away before completing a request: {}", self.peer_addr, e);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Aborting connection from {}: {}", self.peer_addr, e);
                return Err(e);
            }
        };

        let role = request.role();
        tracing::debug!("Dispatching {} from {}", role, self.peer_addr);
        tracing::trace!("Request from {}: {:?}", self.peer_addr, request);

        let reply = self.worker.execute(request);
        let mut response = Response::ok(&reply)?;
        if response.payload.len() > MAX_PAYLOAD_SIZE as usize {
            tracing::warn!(
                "{} reply for {} is {} bytes (max {})",
                role,
                self.peer_addr,
                response.payload.len(),
                MAX_PAYLOAD_SIZE
            );
            response = Response::error(&format!("{} reply exceeds {} bytes", role, MAX_PAYLOAD_SIZE));
        }

        if let Err(e) = self.send_response(&response) {
            if let WorkerError::Io(ref io_err) = e {
                if is_hangup(io_err.kind()) {
                    tracing::debug!(
                        "Client {} disconnected before {} response could be sent: {}",
                        self.peer_addr,
                        role,
                        e
                    );
                    return Ok(());
                }
            }
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            return Err(e);
        }

        tracing::debug!("Completed {} for {}", role, self.peer_addr);
        Ok(())
    }

    /// Send a response to the master
    fn send_response(&mut self, response: &Response) -> Result<()> {
        write_response(&mut self.writer, response)
    }
}

/// Peer closed, reset, or stalled past the timeout
fn is_hangup(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
