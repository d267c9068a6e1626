//! storekeep Worker Binary
//!
//! Starts a catalog worker and serves the master until killed.

use std::sync::Arc;

use clap::Parser;
use storekeep::network::Server;
use storekeep::{Config, DistanceMetric, SalesTally, Worker};
use tracing_subscriber::{fmt, EnvFilter};

/// storekeep catalog worker
#[derive(Parser, Debug)]
#[command(name = "storekeep-worker")]
#[command(about = "Catalog worker node for the store search and ordering service")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    listen: String,

    /// Pool threads serving connections
    #[arg(short = 't', long, default_value = "8")]
    threads: usize,

    /// Connections allowed to wait for a pool thread
    #[arg(short, long, default_value = "64")]
    queue: usize,

    /// Catalog shards (independent locks)
    #[arg(short, long, default_value = "16")]
    shards: usize,

    /// Read/write timeout per connection in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Geo filter distance formula: planar or haversine
    #[arg(long, default_value = "planar")]
    metric: DistanceMetric,

    /// Store-category sales accumulation: cumulative or per-store
    #[arg(long, default_value = "cumulative")]
    sales_tally: SalesTally,

    /// Leave the diagnostic store out of geo search results
    #[arg(long)]
    no_diagnostic: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storekeep=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("storekeep worker v{}", storekeep::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .worker_threads(args.threads)
        .queue_capacity(args.queue)
        .shard_count(args.shards)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .distance_metric(args.metric)
        .sales_tally(args.sales_tally)
        .diagnostic_sentinel(!args.no_diagnostic)
        .build();

    let worker = match Worker::new(config.clone()) {
        Ok(w) => Arc::new(w),
        Err(e) => {
            tracing::error!("Failed to start worker: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, worker) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
