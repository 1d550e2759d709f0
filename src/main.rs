//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dnscheck` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing one JSON result per domain
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use dnscheck::initialization::init_logger_with;
use dnscheck::{read_domains, run_check, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), e.g. DNSCHECK_NAMESERVERS.
    // Try the current directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    let config = Config::from(&opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut domains = opt.domains.clone();
    if let Some(path) = &opt.file {
        domains.extend(read_domains(path).await?);
    }
    if domains.is_empty() {
        eprintln!("dnscheck error: no domains given (pass them as arguments or with --file)");
        process::exit(2);
    }

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling remaining analyses");
            cancel_on_signal.cancel();
        }
    });

    match run_check(&config, domains, &cancel).await {
        Ok(batch) => {
            for result in &batch.results {
                let line = if opt.pretty {
                    serde_json::to_string_pretty(result)?
                } else {
                    serde_json::to_string(result)?
                };
                println!("{line}");
            }
            batch.stats.log_summary();
            if batch.failed() > 0 {
                log::warn!(
                    "{} of {} domain(s) produced no report",
                    batch.failed(),
                    batch.results.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("dnscheck error: {:#}", e);
            process::exit(1);
        }
    }
}
