//! Line-oriented text protocol
//!
//! `SET nome "João Silva"` in, `OK` out. Verbs are case-insensitive,
//! arguments are whitespace separated, and double quotes group a value
//! containing spaces. Inside quotes `\"`, `\\`, `\n`, `\r` and `\t` are
//! escapes; the encoder emits the same escapes so quoted output parses back.

use crate::ProtocolError;
use crate::protocol::command::{Command, Reply, validate_key};
use itoa::Buffer;

/// Parse one request line
pub fn parse(line: &str) -> Result<Command, ProtocolError> {
    let mut tokens = tokenize(line)?.into_iter();
    let verb = tokens.next().ok_or(ProtocolError::EmptyCommand)?;
    let args: Vec<String> = tokens.collect();

    if cmd_eq(&verb, &["get"]) {
        let key = single_key(args, "GET", "GET <key>")?;
        Ok(Command::Get { key })
    } else if cmd_eq(&verb, &["set"]) {
        parse_set(args)
    } else if cmd_eq(&verb, &["del", "delete"]) {
        let key = single_key(args, "DEL", "DEL <key>")?;
        Ok(Command::Del { key })
    } else if cmd_eq(&verb, &["exists"]) {
        let key = single_key(args, "EXISTS", "EXISTS <key>")?;
        Ok(Command::Exists { key })
    } else if cmd_eq(&verb, &["keys"]) {
        no_args(&args, "KEYS").map(|()| Command::Keys)
    } else if cmd_eq(&verb, &["flush", "flushall"]) {
        no_args(&args, "FLUSH").map(|()| Command::Flush)
    } else if cmd_eq(&verb, &["size", "dbsize"]) {
        no_args(&args, "SIZE").map(|()| Command::Size)
    } else if cmd_eq(&verb, &["ping"]) {
        no_args(&args, "PING").map(|()| Command::Ping)
    } else {
        Err(ProtocolError::UnknownCommand(verb))
    }
}

/// Encode a reply without a trailing newline
pub fn encode(reply: &Reply) -> String {
    let mut out = String::new();
    encode_into(reply, &mut out);
    out
}

/// Append the encoded reply to `out`
///
/// A key listing spans one line per key; every other reply is a single line.
pub fn encode_into(reply: &Reply, out: &mut String) {
    let mut itoa_buf = Buffer::new();
    match reply {
        Reply::Value(Some(value)) => push_quoted(out, value),
        Reply::Value(None) => out.push_str("null"),
        Reply::Ok => out.push_str("OK"),
        Reply::Bool(true) => out.push('1'),
        Reply::Bool(false) => out.push('0'),
        Reply::Count(n) => out.push_str(itoa_buf.format(*n)),
        Reply::KeyList(keys) => {
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(itoa_buf.format(i + 1));
                out.push_str(") ");
                push_quoted(out, key);
            }
        }
        Reply::Pong => out.push_str("PONG"),
        Reply::Error(message) => {
            out.push_str("(error) ");
            // keep errors on one line
            out.extend(message.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        }
    }
}

/// Case-insensitive verb match against any of the accepted spellings
#[inline]
fn cmd_eq(verb: &str, names: &[&str]) -> bool {
    names.iter().any(|name| verb.eq_ignore_ascii_case(name))
}

/// Parse SET: first argument is the key, the rest joined by single spaces is the value
fn parse_set(args: Vec<String>) -> Result<Command, ProtocolError> {
    if args.len() < 2 {
        return Err(ProtocolError::WrongArity {
            command: "SET",
            usage: "SET <key> <value>",
        });
    }

    let mut args = args.into_iter();
    let key = args.next().unwrap_or_default();
    validate_key(&key)?;
    let value = args.collect::<Vec<_>>().join(" ");

    Ok(Command::Set { key, value })
}

fn single_key(
    args: Vec<String>,
    command: &'static str,
    usage: &'static str,
) -> Result<String, ProtocolError> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(key), None) => {
            validate_key(&key)?;
            Ok(key)
        }
        _ => Err(ProtocolError::WrongArity { command, usage }),
    }
}

fn no_args(args: &[String], command: &'static str) -> Result<(), ProtocolError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ProtocolError::WrongArity {
            command,
            usage: command,
        })
    }
}

/// Split a line on ASCII whitespace, honouring double-quoted tokens
fn tokenize(line: &str) -> Result<Vec<String>, ProtocolError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(char::is_ascii_whitespace).is_some() {}

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => token.push('\n'),
                        Some('r') => token.push('\r'),
                        Some('t') => token.push('\t'),
                        Some(c) => token.push(c),
                        None => return Err(ProtocolError::UnterminatedQuote),
                    },
                    Some(c) => token.push(c),
                    None => return Err(ProtocolError::UnterminatedQuote),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_ascii_whitespace()) {
                token.push(c);
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}
