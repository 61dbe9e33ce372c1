//! lrukv Server Binary
//!
//! Starts the TCP cache server.

use clap::Parser;
use lrukv::network::Server;
use lrukv::{Config, SharedCache};
use tracing_subscriber::{fmt, EnvFilter};

/// lrukv Server
#[derive(Parser, Debug)]
#[command(name = "lrukv-server")]
#[command(about = "In-memory LRU cache server with a binary TCP protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    listen: String,

    /// Cache capacity (number of entries)
    #[arg(short, long, default_value = "1000")]
    capacity: usize,

    /// Maximum concurrent connections
    #[arg(short = 'n', long, default_value = "1024")]
    max_connections: usize,

    /// Socket read/write timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Refuse remote exit requests instead of shutting down
    #[arg(long)]
    disable_remote_shutdown: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lrukv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    if args.capacity == 0 {
        tracing::error!("cache capacity must be at least 1");
        std::process::exit(1);
    }

    tracing::info!("lrukv Server v{}", lrukv::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Cache capacity: {}", args.capacity);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .cache_capacity(args.capacity)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .allow_remote_shutdown(!args.disable_remote_shutdown)
        .build();

    let cache = SharedCache::new(config.cache_capacity);

    // Bind and run
    let mut server = match Server::bind(config, cache) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
