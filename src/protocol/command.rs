//! Protocol-agnostic command and reply types
//!
//! Both wire syntaxes parse into [`Command`] and encode from [`Reply`].

use crate::ProtocolError;

/// Parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// GET <key>
    Get { key: String },

    /// SET <key> <value>
    Set { key: String, value: String },

    /// DEL <key>
    Del { key: String },

    /// EXISTS <key>
    Exists { key: String },

    /// KEYS
    Keys,

    /// FLUSH
    Flush,

    /// SIZE
    Size,

    /// PING
    Ping,
}

impl Command {
    /// Canonical upper-case verb
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Keys => "KEYS",
            Command::Flush => "FLUSH",
            Command::Size => "SIZE",
            Command::Ping => "PING",
        }
    }

    /// Returns true if executing this command can change the store
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::Set { .. } | Command::Del { .. } | Command::Flush
        )
    }
}

/// Outcome of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// GET result; `None` when the key is absent
    Value(Option<String>),
    Ok,
    Bool(bool),
    Count(usize),
    KeyList(Vec<String>),
    Pong,
    Error(String),
}

impl From<ProtocolError> for Reply {
    fn from(err: ProtocolError) -> Self {
        Reply::Error(err.to_string())
    }
}

/// Reject keys that fail the store's precondition
pub fn validate_key(key: &str) -> Result<(), ProtocolError> {
    if key.is_empty() {
        return Err(ProtocolError::EmptyKey);
    }
    Ok(())
}
