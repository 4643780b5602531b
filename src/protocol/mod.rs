//! Wire protocols: a line-oriented text syntax and a JSON document syntax,
//! both mapping onto the same [`Command`] / [`Reply`] pair.

pub mod command;
pub mod response;
pub mod structured;
pub mod text;

pub use command::{Command, Reply, validate_key};
pub use response::ResponseWriter;

/// Which syntax a request line is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Text,
    Structured,
}

impl Syntax {
    /// Documents start with `{`; everything else is a text command
    pub fn detect(line: &str) -> Self {
        if line.trim_ascii_start().starts_with('{') {
            Syntax::Structured
        } else {
            Syntax::Text
        }
    }
}
