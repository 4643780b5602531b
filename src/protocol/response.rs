//! Response framing for the session output stream

use crate::protocol::command::Reply;
use crate::protocol::{structured, text};
use bytes::BytesMut;

/// Accumulates newline-terminated response frames
pub struct ResponseWriter {
    buf: BytesMut,
    scratch: String,
}

impl ResponseWriter {
    /// Create a new response writer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            scratch: String::new(),
        }
    }

    /// Get the internal buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// Take the buffer, leaving an empty buffer in its place
    pub fn take(&mut self) -> BytesMut {
        self.buf.split()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Returns true if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write a reply in the text syntax
    ///
    /// An empty key listing still produces its terminating newline.
    pub fn text(&mut self, reply: &Reply) {
        self.scratch.clear();
        text::encode_into(reply, &mut self.scratch);
        self.buf.extend_from_slice(self.scratch.as_bytes());
        self.buf.extend_from_slice(b"\n");
    }

    /// Write a reply in the JSON syntax
    pub fn structured(&mut self, reply: &Reply) {
        self.line(&structured::encode(reply));
    }

    /// Write a line of free-form text (help, stats)
    pub fn line(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        if !s.ends_with('\n') {
            self.buf.extend_from_slice(b"\n");
        }
    }

    /// Write text with no terminator (prompt)
    pub fn raw(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new(4096)
    }
}
