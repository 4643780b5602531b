//! Request handling: parse, execute, encode
//!
//! [`Engine`] is the embeddable entry point. It owns the shared store and the
//! metrics, picks the codec for each request, and renders codec failures as
//! error replies through that same codec.

use crate::config::StoreConfig;
use crate::dispatch;
use crate::error::ProtocolError;
use crate::metrics::Metrics;
use crate::protocol::{Command, Reply, ResponseWriter, Syntax, structured, text};
use crate::store::MemoryStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Cloneable handle to one store; clones share data and metrics
#[derive(Clone)]
pub struct Engine {
    store: Arc<MemoryStore>,
    metrics: Arc<Metrics>,
}

impl Engine {
    /// Create an engine over an empty store
    pub fn new() -> Self {
        Self::with_parts(Arc::new(MemoryStore::new()), Arc::new(Metrics::new()))
    }

    /// Create an engine over an empty store sized from configuration
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::with_parts(
            Arc::new(MemoryStore::with_config(config)),
            Arc::new(Metrics::new()),
        )
    }

    pub fn with_parts(store: Arc<MemoryStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Execute an already parsed command
    pub fn execute(&self, cmd: Command) -> Reply {
        self.metrics.record_command(&cmd);
        let is_get = matches!(cmd, Command::Get { .. });
        let is_write = cmd.is_write();

        let start = Instant::now();
        let reply = dispatch::execute(cmd, &self.store);
        self.metrics
            .cmd_latency
            .observe(start.elapsed().as_secs_f64());

        if is_get {
            self.metrics.record_lookup(&reply);
        }
        if is_write {
            let size = i64::try_from(self.store.size()).unwrap_or(i64::MAX);
            self.metrics.stored_keys.set(size);
        }
        reply
    }

    /// Parse a request in the given syntax and execute it
    ///
    /// Parse and argument failures come back as [`Reply::Error`]; the store is
    /// not touched for them.
    pub fn request(&self, syntax: Syntax, input: &str) -> Reply {
        self.metrics.record_request(syntax);
        let parsed = match syntax {
            Syntax::Text => text::parse(input),
            Syntax::Structured => structured::parse(input),
        };
        match parsed {
            Ok(cmd) => {
                debug!(command = cmd.name(), ?syntax, "Executing");
                self.execute(cmd)
            }
            Err(e) => self.reject(e),
        }
    }

    /// Handle one text request, returning the text response
    pub fn handle_text(&self, line: &str) -> String {
        text::encode(&self.request(Syntax::Text, line))
    }

    /// Handle one JSON request, returning the JSON response
    pub fn handle_structured(&self, document: &str) -> String {
        structured::encode(&self.request(Syntax::Structured, document))
    }

    /// Handle one request in either syntax, answering in the same syntax
    pub fn handle_line(&self, line: &str) -> String {
        match Syntax::detect(line) {
            Syntax::Text => self.handle_text(line),
            Syntax::Structured => self.handle_structured(line),
        }
    }

    /// Handle one request in either syntax, appending the framed response
    pub fn handle_into(&self, line: &str, response: &mut ResponseWriter) {
        let syntax = Syntax::detect(line);
        let reply = self.request(syntax, line);
        match syntax {
            Syntax::Text => response.text(&reply),
            Syntax::Structured => response.structured(&reply),
        }
    }

    /// Turn a codec failure into an error reply
    pub fn reject(&self, err: ProtocolError) -> Reply {
        self.metrics.record_error(err.kind());
        debug!(error = %err, "Rejected request");
        Reply::from(err)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
