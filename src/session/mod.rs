//! Line-oriented request session over any async byte stream
//!
//! Feeds stdin (or a pipe, or an in-memory buffer in tests) through the
//! engine one line at a time and writes one response frame per request.

mod connection;
mod handler;

use crate::config::SessionConfig;
use crate::engine::Engine;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// One request/response session
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) engine: Engine,
    pub(crate) metrics_enabled: bool,
    pub(crate) interactive: bool,
    pub(crate) cancel_token: CancellationToken,
}

impl Session {
    /// Create a non-interactive session with metrics enabled
    pub fn new(config: SessionConfig, engine: Engine, cancel_token: CancellationToken) -> Self {
        Self {
            config,
            engine,
            metrics_enabled: true,
            interactive: false,
            cancel_token,
        }
    }

    /// Print banner and prompts (for a terminal)
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Allow the `stats` command
    #[must_use]
    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Run until EOF, `quit`, or cancellation
    pub async fn run<R, W>(&self, reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(interactive = self.interactive, "Session started");
        let result = connection::handle(self, reader, writer).await;
        info!(keys = self.engine.store().size(), "Session ended");
        result
    }
}
