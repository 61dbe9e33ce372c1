//! # lrukv
//!
//! An in-memory key-value cache server with:
//! - Bounded LRU eviction with O(1) get/put
//! - A compact binary TCP protocol tagged by a 16-bit magic/flags field
//! - A line-oriented ASCII fallback for telnet-style clients
//! - One worker thread per connection against a single shared cache
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (accept loop, one worker per client)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Dispatcher                        │
//! │           (mode byte → binary frame | ASCII line)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │ SharedCache │
//!   │ (flags+UTF8)│          │   (Mutex)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  LruCache   │
//!                           │ (arena list)│
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod cache;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use cache::{CacheStats, LruCache, SharedCache};
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of lrukv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
