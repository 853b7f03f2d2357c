//! Startup configuration: command-line flags with environment fallbacks.

use anyhow::ensure;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "gradeviewd", version, about = "Grade dataset view engine sidecar")]
pub struct Config {
    /// Dataset location tried first (file path or http(s) URL)
    #[arg(long, env = "GRADEVIEWD_PRIMARY", default_value = "data.json")]
    pub primary: String,

    /// Dataset location tried once when the primary fails
    #[arg(long, env = "GRADEVIEWD_FALLBACK", default_value = "../data.json")]
    pub fallback: String,

    /// Timeout for HTTP dataset locations (seconds)
    #[arg(long, env = "GRADEVIEWD_HTTP_TIMEOUT_SECS", default_value = "30")]
    pub http_timeout_secs: u64,

    /// Log filter directives, written to stderr
    #[arg(long, env = "GRADEVIEWD_LOG", default_value = "gradeviewd=info")]
    pub log_filter: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.primary.trim().is_empty(), "--primary must not be empty");
        ensure!(!self.fallback.trim().is_empty(), "--fallback must not be empty");
        ensure!(
            self.http_timeout_secs > 0,
            "--http-timeout-secs must be greater than zero"
        );
        Ok(())
    }
}
