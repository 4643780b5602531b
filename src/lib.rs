//! # rustdis
//!
//! Embeddable in-memory key-value cache with a Redis-like command set.
//!
//! ## Features
//!
//! - GET, SET, DEL, EXISTS, KEYS, FLUSH, SIZE, PING
//! - Two request syntaxes over one execution core:
//!   - text lines: `SET nome "João Silva"` → `OK`
//!   - JSON documents: `{"command": "GET", "args": {"key": "nome"}}` → `"João Silva"`
//! - Multiple-reader / single-writer store safe to share across threads
//! - Prometheus metrics for commands, hits/misses and rejected requests
//! - Async line session for stdin/stdout or any other byte stream
//!
//! ## Example
//!
//! ```
//! use rustdis::Engine;
//!
//! let engine = Engine::new();
//! assert_eq!(engine.handle_text("SET nome Lucas"), "OK");
//! assert_eq!(engine.handle_text("GET nome"), "\"Lucas\"");
//! assert_eq!(
//!     engine.handle_structured(r#"{"command": "EXISTS", "args": {"key": "nome"}}"#),
//!     "true"
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! text line ─▶ protocol::text::parse       ─┐
//!                                           ├─▶ Command ─▶ dispatch::execute ─▶ Reply
//! JSON doc  ─▶ protocol::structured::parse ─┘                  │                  │
//!                                                               ▼                  │
//!                                                   MemoryStore (RwLock<HashMap>)  │
//! response  ◀─ encoded by the codec that parsed the request ◀──────────────────────┘
//! ```

// Modules
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use engine::Engine;
pub use error::{ErrorKind, ProtocolError, Result, RustdisError};
