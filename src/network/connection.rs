//! Connection Handler
//!
//! The per-connection dispatcher. Reads one mode byte: `0xFF` selects the
//! binary protocol, anything else starts an ASCII line (with that byte as
//! its first character). Either way the connection serves exactly one
//! exchange and closes.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::network::ShutdownHandle;
use crate::protocol::{
    read_request, write_response, Direction, Message, Operation, BINARY_MODE,
};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared cache handle
    cache: SharedCache,

    /// Raised after a permitted exit request is acknowledged
    shutdown: ShutdownHandle,

    /// Whether exit requests may stop the server
    allow_remote_shutdown: bool,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O over a cloned stream
    pub fn new(
        stream: TcpStream,
        cache: SharedCache,
        shutdown: ShutdownHandle,
        config: &Config,
    ) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            cache,
            shutdown,
            allow_remote_shutdown: config.allow_remote_shutdown,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Serve the connection's single exchange (blocking)
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("connection established from {}", self.peer_addr);

        let mut mode = [0u8; 1];
        match self.reader.read_exact(&mut mode) {
            Ok(()) => {}
            Err(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // Client connected and left without sending anything
                tracing::debug!("client {} disconnected", self.peer_addr);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        if mode[0] == BINARY_MODE {
            self.binary()
        } else {
            self.ascii(mode[0])
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    // =========================================================================
    // Binary path
    // =========================================================================

    /// One framed request, one framed response
    fn binary(&mut self) -> Result<()> {
        let request = read_request(&mut self.reader)?;

        if request.direction != Direction::Request {
            return Err(KvError::Protocol(format!(
                "expected a request frame from {}, got a response",
                self.peer_addr
            )));
        }

        tracing::debug!(
            "{} request from {} (key {:?})",
            request.operation,
            self.peer_addr,
            request.key
        );

        let response = self.dispatch(&request);
        write_response(&mut self.writer, &response)?;

        // The acknowledgment is already flushed; stopping the accept loop
        // afterwards means the client always hears back first.
        if request.operation == Operation::Exit && self.allow_remote_shutdown {
            tracing::info!("exit requested by {}, stopping server", self.peer_addr);
            self.shutdown.request();
        }

        Ok(())
    }

    /// Run one cache operation and phrase the response
    fn dispatch(&self, request: &Message) -> Message {
        match request.operation {
            Operation::Get => {
                let text = match self.cache.get(&request.key) {
                    Some(value) => format!("Key [{}] holds [{}]", request.key, value),
                    None => format!("Key [{}] not found", request.key),
                };
                Message::response(Operation::Get, text)
            }
            Operation::Set => {
                // put returns the previous value, so insert-vs-overwrite
                // phrasing is decided inside the same locked operation
                let text = match self.cache.put(request.key.clone(), request.value.clone()) {
                    Some(old) => format!(
                        "Overwrote [{}] with [{}] (was [{}])",
                        request.key, request.value, old
                    ),
                    None => format!("Stored [{}] = [{}]", request.key, request.value),
                };
                Message::response(Operation::Set, text)
            }
            Operation::Stats => {
                Message::response(Operation::Stats, format!("STATS: {}", self.cache.stats()))
            }
            Operation::Exit => {
                let text = if self.allow_remote_shutdown {
                    "Exit acknowledged, server going offline"
                } else {
                    "Remote shutdown is disabled on this server"
                };
                Message::response(Operation::Exit, text)
            }
        }
    }

    // =========================================================================
    // ASCII path
    // =========================================================================

    /// One whitespace-split text line, newline-terminated plain-text replies
    fn ascii(&mut self, first: u8) -> Result<()> {
        let mut line = String::new();
        line.push(first as char);
        self.reader.read_line(&mut line)?;
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        tracing::debug!("ascii request from {}: {:?}", self.peer_addr, line);

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((op, args)) = tokens.split_first() else {
            writeln!(self.writer, "Empty request")?;
            self.writer.flush()?;
            return Ok(());
        };

        match Operation::parse(op) {
            Ok(Operation::Set) => {
                for pair in args.chunks(2) {
                    match pair {
                        [key, value] => match self.cache.put(*key, *value) {
                            Some(old) => writeln!(
                                self.writer,
                                "Overwrote [{key}] with [{value}] (was [{old}])"
                            )?,
                            None => writeln!(self.writer, "Stored [{key}] = [{value}]")?,
                        },
                        [key] => writeln!(self.writer, "Missing value for key [{key}]")?,
                        _ => unreachable!("chunks(2) yields one or two tokens"),
                    }
                }
            }
            Ok(Operation::Get) => {
                for key in args {
                    match self.cache.get(key) {
                        Some(value) => writeln!(self.writer, "Key [{key}] holds [{value}]")?,
                        None => writeln!(self.writer, "Key [{key}] not found")?,
                    }
                }
            }
            Ok(Operation::Stats) => {
                writeln!(self.writer, "STATS: {}", self.cache.stats())?;
            }
            // exit is binary-only; over ASCII it is just an unknown token
            Ok(Operation::Exit) | Err(_) => {
                tracing::warn!(
                    "unsupported ascii operation {:?} from {}",
                    op,
                    self.peer_addr
                );
                writeln!(self.writer, "Unsupported operation [{op}]")?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}
