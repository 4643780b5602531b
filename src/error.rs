//! Error types for rustdis

use thiserror::Error;

/// Main error type for rustdis
#[derive(Error, Debug)]
pub enum RustdisError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Which side of the request a [`ProtocolError`] blames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed line or document: unknown verb, wrong arity, bad quoting, bad JSON.
    Parse,
    /// Well-formed command whose argument fails a precondition.
    Argument,
}

/// Request errors raised by the codecs before anything reaches the store.
///
/// The `Display` text is what clients see after `(error) ` or inside
/// `{"error": ...}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty command")]
    EmptyCommand,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("wrong number of arguments for '{command}': usage {usage}")]
    WrongArity {
        command: &'static str,
        usage: &'static str,
    },

    #[error("missing argument '{arg}' for '{command}'")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("invalid JSON: {0}")]
    MalformedDocument(String),

    #[error("line too long (max {0} bytes)")]
    LineTooLong(usize),

    #[error("key must not be empty")]
    EmptyKey,
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::EmptyKey => ErrorKind::Argument,
            _ => ErrorKind::Parse,
        }
    }
}

pub type Result<T> = std::result::Result<T, RustdisError>;
