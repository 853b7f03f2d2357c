mod collate;
mod config;
mod dataset;
mod demo;
mod ipc;
mod query;
mod sampler;
mod views;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) {
    // stdout carries the IPC replies; logs go to stderr.
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("gradeviewd=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = config::Config::parse();
    config.validate()?;
    init_tracing(&config.log_filter);

    let fetcher = dataset::LocationFetcher::new(Duration::from_secs(config.http_timeout_secs))?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        primary = %config.primary,
        fallback = %config.fallback,
        "gradeviewd starting"
    );
    let mut state = ipc::AppState::new(config, Box::new(fetcher));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                let _ = writeln!(stdout, "{}", ipc::bad_json(&e));
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
