//! Command execution against the store
//!
//! Pure mapping from [`Command`] to [`Reply`]: every store operation is total,
//! so nothing here produces [`Reply::Error`].

use crate::protocol::{Command, Reply};
use crate::store::MemoryStore;

/// Execute a parsed command
pub fn execute(cmd: Command, store: &MemoryStore) -> Reply {
    match cmd {
        Command::Get { key } => Reply::Value(store.get(&key)),
        Command::Set { key, value } => {
            store.set(key, value);
            Reply::Ok
        }
        Command::Del { key } => Reply::Bool(store.delete(&key)),
        Command::Exists { key } => Reply::Bool(store.exists(&key)),
        Command::Keys => Reply::KeyList(store.keys()),
        Command::Flush => {
            store.flush();
            Reply::Ok
        }
        Command::Size => Reply::Count(store.size()),
        Command::Ping => Reply::Pong,
    }
}
