//! JSON document protocol
//!
//! Request: `{"command": "SET", "args": {"key": "k", "value": "v"}}`.
//! Response: a single JSON value (`"OK"`, `"v"`, `null`, `true`, `3`,
//! `["k"]`, `"PONG"`, or `{"error": "..."}`).

use crate::ProtocolError;
use crate::protocol::command::{Command, Reply, validate_key};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct Request {
    command: String,
    /// Inspected only by commands that take a key
    #[serde(default)]
    args: Option<Value>,
}

/// Parse one request document
pub fn parse(input: &str) -> Result<Command, ProtocolError> {
    let request: Request = serde_json::from_str(input)
        .map_err(|e| ProtocolError::MalformedDocument(e.to_string()))?;
    let verb = request.command.trim().to_ascii_uppercase();
    let args = request.args.as_ref();

    match verb.as_str() {
        "GET" => Ok(Command::Get {
            key: require_key(args, "GET")?,
        }),
        "SET" => {
            let key = require_key(args, "SET")?;
            let value = arg(args, "value", "SET")?.ok_or(ProtocolError::MissingArgument {
                command: "SET",
                arg: "value",
            })?;
            Ok(Command::Set { key, value })
        }
        "DEL" | "DELETE" => Ok(Command::Del {
            key: require_key(args, "DEL")?,
        }),
        "EXISTS" => Ok(Command::Exists {
            key: require_key(args, "EXISTS")?,
        }),
        "KEYS" => Ok(Command::Keys),
        "FLUSH" | "FLUSHALL" => Ok(Command::Flush),
        "SIZE" | "DBSIZE" => Ok(Command::Size),
        "PING" => Ok(Command::Ping),
        "" => Err(ProtocolError::EmptyCommand),
        _ => Err(ProtocolError::UnknownCommand(request.command)),
    }
}

/// Encode a reply as a JSON value
pub fn to_value(reply: &Reply) -> Value {
    match reply {
        Reply::Value(Some(value)) => Value::String(value.clone()),
        Reply::Value(None) => Value::Null,
        Reply::Ok => Value::String("OK".to_string()),
        Reply::Bool(b) => Value::Bool(*b),
        Reply::Count(n) => json!(n),
        Reply::KeyList(keys) => json!(keys),
        Reply::Pong => Value::String("PONG".to_string()),
        Reply::Error(message) => json!({ "error": message }),
    }
}

/// Encode a reply as compact JSON text
pub fn encode(reply: &Reply) -> String {
    to_value(reply).to_string()
}

fn require_key(args: Option<&Value>, command: &'static str) -> Result<String, ProtocolError> {
    let key = arg(args, "key", command)?
        .ok_or(ProtocolError::MissingArgument { command, arg: "key" })?;
    validate_key(&key)?;
    Ok(key)
}

/// Pull one string field out of `args`; absent or null fields are `None`
fn arg(
    args: Option<&Value>,
    name: &'static str,
    command: &'static str,
) -> Result<Option<String>, ProtocolError> {
    let fields = match args {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(ProtocolError::MalformedDocument(format!(
                "'args' for '{command}' must be an object"
            )));
        }
    };
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ProtocolError::MalformedDocument(format!(
            "'{name}' for '{command}' must be a string"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cmd = parse(r#"{"command": "GET", "args": {"key": "test"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Get {
                key: "test".to_string()
            }
        );
    }

    #[test]
    fn test_parse_set() {
        let cmd =
            parse(r#"{"command":"SET","args":{"key":"test","value":"json_value"}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                key: "test".to_string(),
                value: "json_value".to_string()
            }
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        let cmd = parse(r#"{"command": "exists", "args": {"key": "k"}}"#).unwrap();
        assert!(matches!(cmd, Command::Exists { .. }));
    }

    #[test]
    fn test_parse_no_arg_commands_ignore_args() {
        assert_eq!(parse(r#"{"command": "KEYS"}"#), Ok(Command::Keys));
        assert_eq!(
            parse(r#"{"command": "PING", "args": {"key": "ignored"}}"#),
            Ok(Command::Ping)
        );
        assert_eq!(parse(r#"{"command": "size", "args": {}}"#), Ok(Command::Size));
        assert_eq!(parse(r#"{"command": "FLUSH", "args": null}"#), Ok(Command::Flush));
    }

    #[test]
    fn test_parse_no_arg_commands_ignore_any_args() {
        assert_eq!(parse(r#"{"command":"PING","args":{"key":1}}"#), Ok(Command::Ping));
        assert_eq!(parse(r#"{"command":"KEYS","args":"*"}"#), Ok(Command::Keys));
        assert_eq!(parse(r#"{"command":"SIZE","args":[]}"#), Ok(Command::Size));
        assert_eq!(
            parse(r#"{"command":"FLUSH","args":{"value":false}}"#),
            Ok(Command::Flush)
        );
    }

    #[test]
    fn test_parse_args_must_be_object() {
        for input in [
            r#"{"command":"SET","args":["k","v"]}"#,
            r#"{"command":"GET","args":"k"}"#,
        ] {
            match parse(input) {
                Err(ProtocolError::MalformedDocument(msg)) => {
                    assert!(msg.contains("must be an object"), "{msg}");
                }
                other => panic!("unexpected for {input}: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_unknown_arg_fields_ignored() {
        let cmd = parse(r#"{"command": "DEL", "args": {"key": "k", "ttl": 5}}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Del {
                key: "k".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_args() {
        assert_eq!(
            parse(r#"{"command": "GET"}"#),
            Err(ProtocolError::MissingArgument {
                command: "GET",
                arg: "key"
            })
        );
        assert_eq!(
            parse(r#"{"command": "SET", "args": {"key": "k"}}"#),
            Err(ProtocolError::MissingArgument {
                command: "SET",
                arg: "value"
            })
        );
    }

    #[test]
    fn test_parse_empty_key() {
        assert_eq!(
            parse(r#"{"command": "GET", "args": {"key": ""}}"#),
            Err(ProtocolError::EmptyKey)
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse(r#"{"command": "HGET", "args": {"key": "k"}}"#),
            Err(ProtocolError::UnknownCommand("HGET".to_string()))
        );
    }

    #[test]
    fn test_parse_malformed() {
        for input in [
            "{not json",
            r#"{"args": {"key": "k"}}"#,
            r#"{"command": 5}"#,
            r#"{"command": "SET", "args": {"key": "k", "value": 30}}"#,
        ] {
            match parse(input) {
                Err(ProtocolError::MalformedDocument(_)) => {}
                other => panic!("unexpected for {input}: {:?}", other),
            }
        }
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(&Reply::Ok), r#""OK""#);
        assert_eq!(encode(&Reply::Pong), r#""PONG""#);
        assert_eq!(encode(&Reply::Value(Some("json_value".to_string()))), r#""json_value""#);
        assert_eq!(encode(&Reply::Value(None)), "null");
        assert_eq!(encode(&Reply::Bool(true)), "true");
        assert_eq!(encode(&Reply::Bool(false)), "false");
        assert_eq!(encode(&Reply::Count(3)), "3");
        assert_eq!(
            encode(&Reply::KeyList(vec!["a".to_string(), "b".to_string()])),
            r#"["a","b"]"#
        );
        assert_eq!(encode(&Reply::KeyList(Vec::new())), "[]");
        assert_eq!(
            encode(&Reply::Error("empty command".to_string())),
            r#"{"error":"empty command"}"#
        );
    }

    #[test]
    fn test_encode_escapes_value() {
        let reply = Reply::Value(Some("say \"hi\"\n".to_string()));
        assert_eq!(encode(&reply), r#""say \"hi\"\n""#);
    }
}
