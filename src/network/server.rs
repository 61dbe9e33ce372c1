//! TCP Server
//!
//! Accepts connections and dispatches each to its own worker thread.
//! The accept loop runs nonblocking and polls a shared shutdown flag, so
//! a permitted `exit` request stops the server without killing the
//! process mid-write.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::network::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_MS: u64 = 10;

/// Flag shared between the accept loop and every dispatcher.
///
/// A dispatcher raises it when a permitted `exit` request has been
/// acknowledged; the accept loop observes it and returns.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the accept loop to stop
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// TCP server for lrukv
pub struct Server {
    config: Config,
    cache: SharedCache,
    listener: TcpListener,
    shutdown: ShutdownHandle,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the configured listen address.
    ///
    /// Binding is separate from [`run`](Self::run) so callers can learn
    /// the actual port (e.g. when binding port 0) before the loop starts.
    pub fn bind(config: Config, cache: SharedCache) -> Result<Self> {
        if config.cache_capacity == 0 {
            return Err(KvError::Config(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            cache,
            listener,
            shutdown: ShutdownHandle::new(),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The address the listener actually bound
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A handle that can stop the accept loop from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Run the accept loop (blocking).
    ///
    /// Returns once shutdown is requested or the listener fails. Workers
    /// already dispatched finish their single exchange independently.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "listening on {} (cache capacity {})",
            self.local_addr()?,
            self.config.cache_capacity
        );

        loop {
            if self.shutdown.is_requested() {
                break;
            }

            match self.listener.accept() {
                Ok((stream, peer)) => self.spawn_worker(stream, peer),
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(ACCEPT_POLL_MS));
                }
                Err(e) => {
                    tracing::error!("accept failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        tracing::info!("accept loop stopped");
        Ok(())
    }

    /// Start one worker thread for an accepted connection
    fn spawn_worker(&self, stream: TcpStream, peer: SocketAddr) {
        if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
            tracing::warn!(
                "connection cap {} reached, dropping {}",
                self.config.max_connections,
                peer
            );
            return;
        }

        self.active.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveGuard(Arc::clone(&self.active));

        let cache = self.cache.clone();
        let shutdown = self.shutdown.clone();
        let config = self.config.clone();

        thread::spawn(move || {
            let _guard = guard;

            // The accepted stream may inherit the listener's nonblocking
            // flag; workers want plain blocking reads with timeouts.
            if let Err(e) = stream.set_nonblocking(false) {
                tracing::warn!("failed to configure socket for {}: {}", peer, e);
                return;
            }

            match Connection::new(stream, cache, shutdown, &config) {
                Ok(mut conn) => {
                    if let Err(e) =
                        conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)
                    {
                        tracing::warn!("failed to set timeouts for {}: {}", peer, e);
                        return;
                    }
                    if let Err(e) = conn.handle() {
                        tracing::warn!("connection error from {}: {}", conn.peer_addr(), e);
                    }
                }
                Err(e) => tracing::warn!("failed to set up connection from {}: {}", peer, e),
            }
        });
    }
}

/// Decrements the live-worker count when a worker finishes
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
