//! Per-line handling: session commands first, then the engine

use super::Session;
use crate::protocol::{Reply, ResponseWriter};

pub(crate) const BANNER: &str = "Welcome to rustdis - an in-memory key-value cache.\n\
Type 'help' for available commands or 'quit' to exit.\n";

const HELP: &str = "\
Available commands:
  GET <key>           - Get value by key
  SET <key> <value>   - Set key-value pair (quote values with spaces)
  DEL <key>           - Delete key
  EXISTS <key>        - Check if key exists
  KEYS                - List all keys
  FLUSH               - Clear all data
  SIZE                - Get number of keys
  PING                - Test connection
  stats               - Show metrics
  help                - Show this help
  quit/exit           - End the session

JSON requests are accepted too:
  {\"command\": \"GET\", \"args\": {\"key\": \"mykey\"}}
";

/// Whether the session keeps reading after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Handle one raw input line (newline already removed)
pub(crate) fn handle_line(session: &Session, raw: &[u8], response: &mut ResponseWriter) -> Flow {
    let decoded = String::from_utf8_lossy(raw);
    let line = decoded.trim_ascii();

    if line.is_empty() {
        return Flow::Continue;
    }

    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Flow::Quit;
    }

    if line.eq_ignore_ascii_case("help") {
        response.line(HELP);
    } else if line.eq_ignore_ascii_case("stats") {
        if session.metrics_enabled {
            response.line(&session.engine.metrics().gather());
        } else {
            response.text(&Reply::Error("metrics are disabled".to_string()));
        }
    } else {
        session.engine.handle_into(line, response);
    }

    Flow::Continue
}
