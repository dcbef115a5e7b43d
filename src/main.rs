//! rate-breaker: error-rate watchdog.
//!
//! Reads lines from stdin and reports every line matching `--pattern` to a
//! rate-based circuit breaker. Exits with status 1 when the breaker trips
//! (unless `--rearm` is set), 0 on EOF or Ctrl-C.
//!
//! ```text
//! tail -F mail.log | rate-breaker --pattern "send failed" --limit 3 --cooldown-ms 3000
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use rate_breaker::config::validation::validate_config;
use rate_breaker::config::{load_config, ConfigError, WatchdogConfig};
use rate_breaker::observability::logging::init_tracing;
use rate_breaker::{ExitReason, Shutdown, TracingLog, Watchdog};

#[derive(Parser)]
#[command(name = "rate-breaker")]
#[command(about = "Trip when matching input lines arrive too fast", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Breaker name used in logs and metrics.
    #[arg(long)]
    name: Option<String>,

    /// Errors inside one window that trip the breaker.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Quiet period after the last error before the count resets.
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Substring a line must contain to count as an error.
    #[arg(short, long)]
    pattern: Option<String>,

    /// Start a new cycle after a trip instead of exiting.
    #[arg(long)]
    rearm: bool,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn resolve(self) -> Result<WatchdogConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => WatchdogConfig::default(),
        };

        if let Some(name) = self.name {
            config.breaker.name = name;
        }
        if let Some(limit) = self.limit {
            config.breaker.limit = limit;
        }
        if let Some(cooldown_ms) = self.cooldown_ms {
            config.breaker.cooldown_ms = cooldown_ms;
        }
        if let Some(pattern) = self.pattern {
            config.watch.pattern = pattern;
        }
        if self.rearm {
            config.watch.rearm = true;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Cli::parse().resolve()?;

    init_tracing(&config.observability.log_level);

    tracing::info!(
        breaker = %config.breaker.name,
        limit = config.breaker.limit,
        cooldown_ms = config.breaker.cooldown_ms,
        pattern = %config.watch.pattern,
        rearm = config.watch.rearm,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let watchdog = Watchdog::new(&config, Arc::new(TracingLog))?;
    let summary = watchdog
        .run(BufReader::new(tokio::io::stdin()), shutdown.subscribe())
        .await?;

    if summary.reason == ExitReason::Tripped {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
