/// Whisper Daemon - anonymous message relay
///
/// This daemon:
/// - Loads the relay configuration and seeds founder invitation quotas
/// - Accepts platform events on an HTTP webhook
/// - Routes every event through the relay state machine

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};

use whisper_common::RelayConfig;
use whisper_core::{BuiltinCatalog, MemoryStore};
use whisper_daemon::{ApiServer, DaemonRouter, LogTransport};

const DEFAULT_CONFIG_PATH: &str = "whisper.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "help" | "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "version" | "--version" | "-v" => {
                println!("Whisper Daemon v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--config" | "-c" => {
                let path = rest.next().context("--config needs a path")?;
                config_path = PathBuf::from(path);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run with 'help' to see available commands");
                std::process::exit(1);
            }
        }
    }

    let config = load_config(&config_path)?.apply_env();

    // Initialize logging
    let level = if config.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Starting Whisper Daemon v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    run(config).await
}

fn load_config(path: &PathBuf) -> Result<RelayConfig> {
    if path.exists() {
        return Ok(RelayConfig::from_file(path)?);
    }

    let config = RelayConfig::default();
    if let Err(e) = config.to_file(path) {
        eprintln!("Failed to save default config to {:?}: {}", path, e);
    } else {
        eprintln!("Saved default configuration to {:?}", path);
    }
    Ok(config)
}

async fn run(config: RelayConfig) -> Result<()> {
    let listen_addr: SocketAddr = config.listen_addr.parse()?;
    let founders = config.founders.clone();

    let router = DaemonRouter::new(
        Arc::new(MemoryStore::new()),
        Arc::new(LogTransport::new()),
        Arc::new(BuiltinCatalog),
        Arc::new(config),
    )?;

    for founder in &founders {
        if let Err(e) = router.seed_founder(founder).await {
            warn!("Failed to seed founder {}: {}", founder.account_id, e);
        }
    }
    info!("Seeded {} founders", founders.len());

    let server = ApiServer::new(listen_addr, Arc::new(router));
    server.start().await?;

    info!("Daemon stopped");
    Ok(())
}

/// Print help message
fn print_help() {
    println!("Whisper Daemon - anonymous message relay");
    println!();
    println!("USAGE:");
    println!("    whisper-daemon [--config <PATH>]");
    println!();
    println!("COMMANDS:");
    println!("    help        Show this help message");
    println!("    version     Show version information");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Configuration file (default: {})", DEFAULT_CONFIG_PATH);
    println!();
    println!("ENVIRONMENT:");
    println!("    WHISPER_LINK_ALPHABET  Secret alphabet for link tokens");
    println!("    WHISPER_BOT_USERNAME   Bot username used in shareable links");
    println!();
    println!("ENDPOINTS:");
    println!("    POST /events    Inbound platform event (JSON)");
    println!("    GET  /health    Health check");
}
