//! pkgindex CLI - package dependency index server.
//!
//! Usage:
//!   pkgindex serve                          # Listen on 0.0.0.0:8080
//!   pkgindex serve --config pkgindex.toml   # Listen on the configured address
//!   pkgindex send 'INDEX|bar|' 'QUERY|bar|' # Talk to a running server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pkgindex::{config::DEFAULT_ADDRESS, start_server, Client, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pkgindex")]
#[command(about = "pkgindex - package dependency index server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the index over TCP until killed
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, overrides the config file
        #[arg(short, long)]
        address: Option<String>,

        /// Log at debug level regardless of config
        #[arg(short, long)]
        verbose: bool,
    },

    /// Send request lines to a running server and print each result
    Send {
        /// Server address
        #[arg(short, long, default_value = DEFAULT_ADDRESS)]
        address: String,

        /// Request lines, e.g. 'INDEX|foo|bar,baz'
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            address,
            verbose,
        } => {
            let config = match config {
                Some(path) => ServerConfig::load(&path)?,
                None => ServerConfig::default(),
            }
            .with_address(address);

            setup_tracing(&config, verbose);
            start_server(&config)?;
        }

        Commands::Send { address, lines } => {
            let mut client = Client::connect(address.as_str())
                .with_context(|| format!("connecting to {}", address))?;
            for line in &lines {
                let code = client.send_line(line)?;
                println!("{}", code);
            }
        }
    }

    Ok(())
}

fn setup_tracing(config: &ServerConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
