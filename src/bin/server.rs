//! # Server Binary Entry Point
//!
//! Thin wrapper that loads configuration and runs the stego-vault HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin stego-vault -- --config config/server.toml
//! ```
//!
//! Without `--config` the built-in defaults are used (listen on
//! `0.0.0.0:8080`, silent truncation when a payload does not fit).

use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;

use stego_vault::common::config::{load_config, ServiceConfig};
use stego_vault::server::serve;

/// Command-line arguments for the server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the service configuration file (TOML format)
    ///
    /// Example: config/server.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address, overriding `[server].address`
    #[arg(short, long)]
    address: Option<String>,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// INFO level by default; `RUST_LOG` overrides it.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let mut config: ServiceConfig = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            load_config(path)?
        }
        None => ServiceConfig::default(),
    };

    if let Some(address) = args.address {
        config.server.address = address;
    }

    serve(config).await
}
