//! Tagmark RPC Server: the bookmark protocol over stdin/stdout.
//!
//! Protocol: one JSON envelope per line (newline-delimited JSON), one reply
//! per line. A `{"event":"ready"}` line is written before the first request
//! is read.

use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use tagmark::app::App;
use tagmark::rpc_handler::handle_message;
use tagmark::types::protocol::{Reply, ERROR_TAG};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

async fn write_line(out: &mut tokio::io::Stdout, value: &impl serde::Serialize) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(value).map_err(std::io::Error::other)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout carries only protocol lines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let app = match App::from_environment() {
        Ok((app, _settings)) => app,
        Err(e) => {
            eprintln!("tagmark-rpc: {}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = tokio::io::stdout();
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if write_line(&mut stdout, &ready).await.is_err() {
        return;
    }

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }

        let reply = if rate_limiter.check() {
            handle_message(&app, &line).await
        } else {
            Reply::failure(Value::Null, ERROR_TAG.to_string(), 429, vec!["rate limit exceeded".to_string()])
        };

        if write_line(&mut stdout, &reply).await.is_err() {
            break;
        }
    }
}
