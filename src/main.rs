//! rustdis - in-memory key-value cache driven over stdin/stdout
//!
//! Reads one request per line (text or JSON) and writes one response per
//! request. Logs go to stderr so stdout carries only protocol output.

// Use jemalloc for better multi-threaded performance (10-30% throughput improvement)
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};
use rustdis::config::Config;
use rustdis::engine::Engine;
use rustdis::session::Session;
use std::io::IsTerminal;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rustdis", version, about = "In-memory key-value cache with a Redis-like protocol")]
struct Cli {
    /// TOML configuration file (defaults plus RUSTDIS_* env vars when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read requests from stdin until EOF or `quit` (default)
    Repl,
    /// Run each argument as one request against a fresh store and print the responses
    ///
    /// Text requests (`'SET a 1'`) get text responses; JSON requests
    /// (`'{"command": "GET", "args": {"key": "a"}}'`) get JSON responses.
    /// All requests in one invocation share the same store.
    Exec {
        #[arg(required = true)]
        requests: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = cli.config.as_deref() {
        info!("Loading configuration from {}", config_path);
        Config::from_file(config_path)?
    } else {
        Config::from_env()
    };

    info!("Configuration: {:?}", config);

    let engine = Engine::with_config(&config.store);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Exec { requests } => {
            for request in &requests {
                println!("{}", engine.handle_line(request));
            }
            Ok(())
        }
        Commands::Repl => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(repl(config, engine));
            // A stdin read may still be parked on the blocking pool
            runtime.shutdown_timeout(Duration::from_millis(100));
            result
        }
    }
}

async fn repl(config: Config, engine: Engine) -> anyhow::Result<()> {
    // Create cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    let session = Session::new(config.session, engine, cancel_token.clone())
        .interactive(interactive)
        .metrics_enabled(config.metrics.enabled);

    // Setup signal handlers
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down...");
            }
            _ = terminate() => {
                info!("Received SIGTERM, shutting down...");
            }
        }
        cancel_token.cancel();
    });

    session.run(tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("rustdis stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exec_help_mentions_json_responses() {
        let cli = Cli::command();
        let exec = cli.find_subcommand("exec").unwrap();
        let help = exec.get_long_about().unwrap().to_string();
        assert!(help.contains("get JSON responses"), "{help}");
    }

    #[test]
    fn test_exec_parses_requests() {
        let cli = Cli::try_parse_from(["rustdis", "exec", "SET a 1", "GET a"]).unwrap();
        match cli.command {
            Some(Commands::Exec { requests }) => assert_eq!(requests, ["SET a 1", "GET a"]),
            _ => panic!("expected exec"),
        }
    }
}
