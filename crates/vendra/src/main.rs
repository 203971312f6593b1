// SPDX-FileCopyrightText: 2026 Vendra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vendra - automated marketplace reply and delivery engine.
//!
//! This is the binary entry point for the Vendra engine.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod engine;

use clap::{Parser, Subcommand};
use tracing::info;

/// Vendra - automated marketplace reply and delivery engine.
#[derive(Parser, Debug)]
#[command(name = "vendra", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Vendra engine.
    Serve,
    /// Validate the configuration and exit.
    Check,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match vendra_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vendra_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.engine.log_level);
            let engine = match engine::Engine::from_config(&config) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("vendra: failed to assemble engine: {e}");
                    std::process::exit(1);
                }
            };

            info!(name = config.engine.name.as_str(), "vendra engine started");

            // Rule and account state is fed by the admin surface; the
            // process stays up until interrupted.
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("vendra: failed to listen for shutdown signal: {e}");
                std::process::exit(1);
            }

            info!("shutdown signal received");
            if let Err(e) = engine.shutdown().await {
                eprintln!("vendra: shutdown error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Check) => {
            println!("vendra: configuration is valid (engine.name={})", config.engine.name);
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("vendra: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("vendra: use --help for available commands");
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vendra={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
