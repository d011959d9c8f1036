//! # OrderDesk Server Entry Point
//!
//! ## Usage
//! ```bash
//! orderdesk-server                          # default config location
//! orderdesk-server --config ./config.toml
//! RUST_LOG=debug ORDERDESK_PORT=9000 orderdesk-server
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

use orderdesk_server::config::ServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    orderdesk_server::init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("OrderDesk Server");
                println!();
                println!("Usage: orderdesk-server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  TOML config file");
                println!("  -h, --help           Show this help message");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let config = match ServerConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match orderdesk_server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}
