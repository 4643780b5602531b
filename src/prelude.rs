//! Prelude module for common imports.
//!
//! ```ignore
//! use rustdis::prelude::*;
//! ```

// Error types
pub use crate::error::{ErrorKind, ProtocolError, Result, RustdisError};

// Configuration
pub use crate::config::{Config, MetricsConfig, SessionConfig, StoreConfig};

// Storage
pub use crate::store::MemoryStore;

// Protocol
pub use crate::protocol::{Command, Reply, ResponseWriter, Syntax};

// Execution
pub use crate::dispatch::execute;
pub use crate::engine::Engine;
pub use crate::metrics::Metrics;
pub use crate::session::Session;

// Common external crates
pub use std::sync::Arc;
pub use tracing::{debug, error, info, trace, warn};
