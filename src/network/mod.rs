//! Network Module
//!
//! TCP server and per-connection dispatch.
//!
//! ## Architecture
//! - Single acceptor loop polling a shutdown flag
//! - One worker thread per accepted connection
//! - Every worker shares the one `SharedCache`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
