//! Prometheus metrics for rustdis

use crate::error::ErrorKind;
use crate::protocol::{Command, Reply, Syntax};
use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry};

/// Per-process metrics, shared by every engine handle
pub struct Metrics {
    pub registry: Registry,

    // Command counters
    pub cmd_get: IntCounter,
    pub cmd_set: IntCounter,
    pub cmd_del: IntCounter,
    pub cmd_exists: IntCounter,
    pub cmd_keys: IntCounter,
    pub cmd_flush: IntCounter,
    pub cmd_size: IntCounter,
    pub cmd_ping: IntCounter,

    // Hit/miss counters
    pub get_hits: IntCounter,
    pub get_misses: IntCounter,

    // Requests by syntax
    pub text_requests: IntCounter,
    pub structured_requests: IntCounter,

    // Store size after the last write
    pub stored_keys: IntGauge,

    // Latency histograms
    pub cmd_latency: Histogram,

    // Error counters
    pub parse_errors: IntCounter,
    pub argument_errors: IntCounter,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        let registry = Registry::new();
        let counter = |name: &str, help: &str| {
            let c = IntCounter::new(name, help).expect("valid counter definition");
            registry
                .register(Box::new(c.clone()))
                .expect("counter registered once");
            c
        };

        let cmd_get = counter("rustdis_cmd_get_total", "Total GET commands");
        let cmd_set = counter("rustdis_cmd_set_total", "Total SET commands");
        let cmd_del = counter("rustdis_cmd_del_total", "Total DEL commands");
        let cmd_exists = counter("rustdis_cmd_exists_total", "Total EXISTS commands");
        let cmd_keys = counter("rustdis_cmd_keys_total", "Total KEYS commands");
        let cmd_flush = counter("rustdis_cmd_flush_total", "Total FLUSH commands");
        let cmd_size = counter("rustdis_cmd_size_total", "Total SIZE commands");
        let cmd_ping = counter("rustdis_cmd_ping_total", "Total PING commands");

        let get_hits = counter("rustdis_get_hits_total", "Total GET hits");
        let get_misses = counter("rustdis_get_misses_total", "Total GET misses");

        let text_requests = counter("rustdis_text_requests_total", "Requests in text syntax");
        let structured_requests = counter(
            "rustdis_structured_requests_total",
            "Requests in JSON syntax",
        );

        let parse_errors = counter("rustdis_parse_errors_total", "Total malformed requests");
        let argument_errors = counter(
            "rustdis_argument_errors_total",
            "Total requests with invalid arguments",
        );

        let stored_keys = IntGauge::new("rustdis_stored_keys", "Keys held by the store")
            .expect("valid gauge definition");
        registry
            .register(Box::new(stored_keys.clone()))
            .expect("gauge registered once");

        let cmd_latency = Histogram::with_opts(
            HistogramOpts::new("rustdis_cmd_latency_seconds", "Command latency in seconds")
                .buckets(vec![
                    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.0001, 0.0005, 0.001, 0.005, 0.01,
                    0.05,
                ]),
        )
        .expect("valid histogram definition");
        registry
            .register(Box::new(cmd_latency.clone()))
            .expect("histogram registered once");

        Self {
            registry,
            cmd_get,
            cmd_set,
            cmd_del,
            cmd_exists,
            cmd_keys,
            cmd_flush,
            cmd_size,
            cmd_ping,
            get_hits,
            get_misses,
            text_requests,
            structured_requests,
            stored_keys,
            cmd_latency,
            parse_errors,
            argument_errors,
        }
    }

    /// Count a request by syntax
    pub fn record_request(&self, syntax: Syntax) {
        match syntax {
            Syntax::Text => self.text_requests.inc(),
            Syntax::Structured => self.structured_requests.inc(),
        }
    }

    /// Count a command by verb
    pub fn record_command(&self, cmd: &Command) {
        match cmd {
            Command::Get { .. } => self.cmd_get.inc(),
            Command::Set { .. } => self.cmd_set.inc(),
            Command::Del { .. } => self.cmd_del.inc(),
            Command::Exists { .. } => self.cmd_exists.inc(),
            Command::Keys => self.cmd_keys.inc(),
            Command::Flush => self.cmd_flush.inc(),
            Command::Size => self.cmd_size.inc(),
            Command::Ping => self.cmd_ping.inc(),
        }
    }

    /// Count a GET outcome
    pub fn record_lookup(&self, reply: &Reply) {
        match reply {
            Reply::Value(Some(_)) => self.get_hits.inc(),
            Reply::Value(None) => self.get_misses.inc(),
            _ => {}
        }
    }

    /// Count a rejected request
    pub fn record_error(&self, kind: ErrorKind) {
        match kind {
            ErrorKind::Parse => self.parse_errors.inc(),
            ErrorKind::Argument => self.argument_errors.inc(),
        }
    }

    /// Get Prometheus formatted metrics
    pub fn gather(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            return format!("# failed to encode metrics: {e}\n");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
