//! Blocking TCP client
//!
//! Mirrors the server's connection discipline: every request opens a
//! fresh connection, performs one framed exchange and closes. Transport
//! errors abort only the request they belong to.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use crate::error::{KvError, Result};
use crate::protocol::{read_response, write_request, Direction, Message, Operation};

/// Client for the binary cache protocol
#[derive(Debug, Clone)]
pub struct Client {
    server_addr: String,
}

impl Client {
    /// Create a client for the given `host:port` address
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
        }
    }

    /// Fetch the descriptive result text for a key
    pub fn get(&self, key: &str) -> Result<String> {
        self.exchange(Message::request(Operation::Get, key, ""))
    }

    /// Store a key-value pair; returns the server's result text
    pub fn set(&self, key: &str, value: &str) -> Result<String> {
        self.exchange(Message::request(Operation::Set, key, value))
    }

    /// Fetch the server's occupancy summary
    pub fn stats(&self) -> Result<String> {
        self.exchange(Message::request(Operation::Stats, "", ""))
    }

    /// Request a server shutdown; returns the acknowledgment (or refusal)
    pub fn shutdown(&self) -> Result<String> {
        self.exchange(Message::request(Operation::Exit, "", ""))
    }

    /// One connection, one framed request, one framed response
    fn exchange(&self, request: Message) -> Result<String> {
        let stream = TcpStream::connect(&self.server_addr)?;
        stream.set_nodelay(true)?;

        let mut writer = BufWriter::new(stream.try_clone()?);
        let mut reader = BufReader::new(stream);

        write_request(&mut writer, &request)?;
        let response = read_response(&mut reader)?;

        if response.direction != Direction::Response {
            return Err(KvError::Protocol(format!(
                "server sent a {:?} frame where a response was expected",
                response.direction
            )));
        }

        Ok(response.value)
    }
}
