//! End-to-end request scenarios through both syntaxes

use rustdis::Engine;
use rustdis::dispatch::execute;
use rustdis::protocol::{Command, Reply, structured, text};
use rustdis::store::MemoryStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

// =============================================================================
// Literal transcripts
// =============================================================================

#[test]
fn test_text_transcript() {
    let engine = Engine::new();
    let transcript = [
        ("SET nome Lucas", "OK"),
        ("GET nome", "\"Lucas\""),
        ("EXISTS nome", "1"),
        ("KEYS", "1) \"nome\""),
        ("DEL nome", "1"),
        ("DEL nome", "0"),
        ("SIZE", "0"),
        ("KEYS", ""),
        ("GET nome", "null"),
        ("PING", "PONG"),
        ("SET nome \"João Silva\"", "OK"),
        ("GET nome", "\"João Silva\""),
        ("FLUSH", "OK"),
    ];
    for (request, expected) in transcript {
        assert_eq!(engine.handle_text(request), expected, "request: {request}");
    }
}

#[test]
fn test_structured_transcript() {
    let engine = Engine::new();
    let transcript = [
        (
            r#"{"command":"SET","args":{"key":"test","value":"json_value"}}"#,
            r#""OK""#,
        ),
        (r#"{"command":"GET","args":{"key":"test"}}"#, r#""json_value""#),
        (r#"{"command":"GET","args":{"key":"nope"}}"#, "null"),
        (r#"{"command":"EXISTS","args":{"key":"test"}}"#, "true"),
        (r#"{"command":"KEYS"}"#, r#"["test"]"#),
        (r#"{"command":"SIZE"}"#, "1"),
        (r#"{"command":"DEL","args":{"key":"test"}}"#, "true"),
        (r#"{"command":"DEL","args":{"key":"test"}}"#, "false"),
        (r#"{"command":"KEYS"}"#, "[]"),
        (r#"{"command":"PING"}"#, r#""PONG""#),
        (r#"{"command":"FLUSH"}"#, r#""OK""#),
    ];
    for (request, expected) in transcript {
        assert_eq!(engine.handle_structured(request), expected, "request: {request}");
    }
}

#[test]
fn test_malformed_requests() {
    let engine = Engine::new();
    engine.handle_text("SET keep me");

    for request in ["GET", "SET onlykey", "NOPE", "DEL a b", "SET k \"open"] {
        let response = engine.handle_text(request);
        assert!(response.starts_with("(error) "), "{request} -> {response}");
        assert!(!response.contains('\n'));
    }
    for request in [
        "{",
        r#"{"command":"GET"}"#,
        r#"{"command":"NOPE"}"#,
        r#"{"command":"SET","args":{"key":"","value":"v"}}"#,
    ] {
        let response = engine.handle_structured(request);
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(parsed["error"].is_string(), "{request} -> {response}");
    }

    assert_eq!(engine.store().size(), 1);
    assert_eq!(engine.handle_text("GET keep"), "\"me\"");
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_round_trip_across_codecs() {
    let values = [
        "simple",
        "with spaces",
        "{'nome': 'João', 'email': 'joao@email.com'}",
        "quote \" and backslash \\",
        "",
    ];
    let engine = Engine::new();

    for (i, value) in values.iter().enumerate() {
        let key = format!("usuario:{i}");

        // SET via JSON, GET via text
        let doc = serde_json::json!({"command": "SET", "args": {"key": key, "value": value}});
        assert_eq!(engine.handle_structured(&doc.to_string()), r#""OK""#);
        let text_reply = engine.handle_text(&format!("GET {key}"));
        match text::parse(&format!("SET {key} {text_reply}")) {
            Ok(Command::Set { value: decoded, .. }) => assert_eq!(decoded, *value),
            other => panic!("unexpected: {:?}", other),
        }

        // SET via text, GET via JSON
        let quoted = text::encode(&Reply::Value(Some((*value).to_string())));
        assert_eq!(engine.handle_text(&format!("SET {key} {quoted}")), "OK");
        let doc = serde_json::json!({"command": "GET", "args": {"key": key}});
        let json_reply: serde_json::Value =
            serde_json::from_str(&engine.handle_structured(&doc.to_string())).unwrap();
        assert_eq!(json_reply, serde_json::Value::String((*value).to_string()));
    }
}

#[test]
fn test_same_command_from_both_syntaxes() {
    assert_eq!(
        text::parse("SET config:timeout 30").unwrap(),
        structured::parse(r#"{"command": "SET", "args": {"key": "config:timeout", "value": "30"}}"#)
            .unwrap()
    );
    assert_eq!(
        text::parse("exists k").unwrap(),
        structured::parse(r#"{"command": "EXISTS", "args": {"key": "k"}}"#).unwrap()
    );
}

#[test]
fn test_flush_clears_fully() {
    let store = MemoryStore::new();
    for i in 0..100 {
        execute(
            Command::Set {
                key: format!("k{i}"),
                value: format!("v{i}"),
            },
            &store,
        );
    }
    execute(Command::Flush, &store);
    assert_eq!(execute(Command::Size, &store), Reply::Count(0));
    assert_eq!(execute(Command::Keys, &store), Reply::KeyList(Vec::new()));
}

#[test]
fn test_exists_reflects_presence() {
    let engine = Engine::new();
    for i in 0..20 {
        engine.handle_text(&format!("SET k{i} v"));
    }
    for i in (0..20).step_by(3) {
        engine.handle_text(&format!("DEL k{i}"));
    }
    for i in 0..25 {
        let key = format!("k{i}");
        let exists = engine.handle_text(&format!("EXISTS {key}")) == "1";
        let present = engine.handle_text(&format!("GET {key}")) != "null";
        assert_eq!(exists, present, "key {key}");
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_sessions_share_store() {
    let engine = Engine::new();
    let handles: Vec<_> = (0..10)
        .map(|i| {
            let engine = engine.clone();
            thread::spawn(move || {
                for j in 0..50 {
                    let line = format!("SET thread:{i}:{j} valor_{j}");
                    assert_eq!(engine.handle_line(&line), "OK");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.handle_text("SIZE"), "500");
    assert_eq!(engine.handle_text("GET thread:3:49"), "\"valor_49\"");
}

#[test]
fn test_concurrent_reads_consistent_snapshot() {
    let store = Arc::new(MemoryStore::new());
    for i in 0..64 {
        store.set(format!("k{i}"), format!("v{i}"));
    }
    let expected: HashSet<String> = (0..64).map(|i| format!("k{i}")).collect();

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let expected = expected.clone();
            thread::spawn(move || {
                for i in 0..64 {
                    let key = format!("k{i}");
                    assert_eq!(store.get(&key), Some(format!("v{i}")));
                    assert!(store.exists(&key));
                    assert_eq!(store.size(), 64);
                    let keys: HashSet<String> = store.keys().into_iter().collect();
                    assert_eq!(keys, expected);
                }
            })
        })
        .collect();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_concurrent_writes_same_key_last_writer_wins() {
    let engine = Engine::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    engine.execute(Command::Set {
                        key: "contended".to_string(),
                        value: format!("writer{i}"),
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    match engine.execute(Command::Get {
        key: "contended".to_string(),
    }) {
        Reply::Value(Some(v)) => assert!(v.starts_with("writer")),
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(engine.store().size(), 1);
}
