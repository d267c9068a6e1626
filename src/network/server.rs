//! TCP Server
//!
//! Accepts connections and hands them to a bounded pool of threads.

use std::io::{BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};

use super::Connection;
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::protocol::{write_response, Response};
use crate::worker::Worker;

/// Sleep between polls of the non-blocking listener
const ACCEPT_POLL: Duration = Duration::from_millis(25);

/// TCP server for a worker
pub struct Server {
    config: Config,
    worker: Arc<Worker>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

/// Stops a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the accept loop to stop. In-flight connections finish first.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// A server running on a background thread
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: ShutdownHandle,
    join: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the server and wait for the pool to drain
    pub fn shutdown(self) -> Result<()> {
        self.shutdown.shutdown();
        self.join
            .join()
            .map_err(|_| WorkerError::Network("server thread panicked".to_string()))?
    }
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, worker: Arc<Worker>) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr)?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            worker,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Run the server on a background thread
    pub fn spawn(self) -> Result<ServerHandle> {
        let local_addr = self.local_addr()?;
        let shutdown = self.shutdown_handle();
        let join = thread::Builder::new()
            .name("storekeep-acceptor".to_string())
            .spawn(move || self.run())?;

        Ok(ServerHandle {
            local_addr,
            shutdown,
            join,
        })
    }

    /// Start the server (blocking until shutdown)
    ///
    /// - Single acceptor (this thread) polling a non-blocking listener
    /// - `worker_threads` pool threads fed by a bounded queue
    /// - A full queue is answered with an OVERLOADED frame and closed
    pub fn run(self) -> Result<()> {
        self.listener.set_nonblocking(true)?;

        let (queue_tx, queue_rx) = channel::bounded::<TcpStream>(self.config.queue_capacity);

        let mut pool = Vec::with_capacity(self.config.worker_threads);
        for id in 0..self.config.worker_threads {
            let queue_rx = queue_rx.clone();
            let worker = Arc::clone(&self.worker);
            let timeouts = (self.config.read_timeout_ms, self.config.write_timeout_ms);
            let handle = thread::Builder::new()
                .name(format!("storekeep-pool-{}", id))
                .spawn(move || serve_queue(queue_rx, worker, timeouts))?;
            pool.push(handle);
        }
        drop(queue_rx);

        tracing::info!(
            "Serving with {} pool threads, queue capacity {}",
            self.config.worker_threads,
            self.config.queue_capacity
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    // Accepted sockets may inherit the listener's non-blocking mode
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", peer, e);
                        continue;
                    }

                    match queue_tx.try_send(stream) {
                        Ok(()) => {}
                        Err(TrySendError::Full(stream)) => {
                            tracing::warn!("Queue full, rejecting connection from {}", peer);
                            reject_overloaded(stream);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            tracing::error!("All pool threads have exited");
                            break;
                        }
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(e) => {
                    tracing::warn!("Accept error: {}", e);
                    thread::sleep(ACCEPT_POLL);
                }
            }
        }

        tracing::info!("Shutting down, draining queued connections");
        drop(queue_tx);
        for handle in pool {
            if handle.join().is_err() {
                tracing::error!("Pool thread panicked");
            }
        }
        Ok(())
    }
}

/// Pool thread body: serve connections until the queue closes
fn serve_queue(queue: Receiver<TcpStream>, worker: Arc<Worker>, (read_ms, write_ms): (u64, u64)) {
    for stream in queue.iter() {
        let result = Connection::new(stream, Arc::clone(&worker)).and_then(|mut connection| {
            connection.set_timeouts(read_ms, write_ms)?;
            connection.handle()
        });

        // Already logged where it happened; the connection is closed on drop
        if let Err(e) = result {
            tracing::debug!("Connection ended with error: {}", e);
        }
    }
}

/// Best-effort OVERLOADED reply for a connection the pool cannot take
fn reject_overloaded(stream: TcpStream) {
    let _ = stream.set_nodelay(true);
    let mut writer = BufWriter::new(stream);
    let _ = write_response(&mut writer, &Response::overloaded("worker queue is full"));
}
