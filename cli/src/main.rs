//! `xavcc`: shorten and expand URLs from the command line.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xavcc_core::{Client, ClientConfig, FormatKind};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// JSON over sf_short_url.json (default)
    Json,
    /// Plain text over simple/encode and simple/decode
    Simple,
    /// XML over sf_short_url.xml
    Xml,
}

impl From<Format> for FormatKind {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => FormatKind::Json,
            Format::Simple => FormatKind::Simple,
            Format::Xml => FormatKind::Xml,
        }
    }
}

#[derive(Parser)]
#[command(name = "xavcc")]
#[command(about = "xav.cc URL shortener client", long_about = None)]
struct Cli {
    /// Wire format used to talk to the API
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// API base URL (overrides XAVCC_SERVER)
    #[arg(long)]
    server: Option<String>,

    /// Request timeout in seconds (overrides XAVCC_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Skip TLS certificate and hostname verification
    #[arg(long)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a long URL
    Encode {
        /// URL to shorten
        url: String,
        /// Requested alias
        #[arg(short, long)]
        alias: Option<String>,
    },
    /// Expand an alias or short link
    Decode {
        /// Alias, or full short link
        alias: String,
    },
    /// Show the full record behind an alias, as JSON
    Lookup {
        /// Alias, or full short link
        alias: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the service produced a result.
fn run(cli: Cli) -> Result<bool> {
    let config = build_config(&cli);
    let format = FormatKind::from(cli.format);
    debug!(%format, server = %config.server, "starting");

    let client = Client::with_config(format.as_str(), config).context("Failed to build client")?;

    match cli.command {
        Commands::Encode { url, alias } => Ok(report(client.encode(&url, alias.as_deref()), "encode")),
        Commands::Decode { alias } => Ok(report(client.decode(&alias), "decode")),
        Commands::Lookup { alias } => match client.lookup(&alias) {
            Some(record) => {
                let json = serde_json::to_string_pretty(&record).context("Failed to render record")?;
                println!("{json}");
                Ok(true)
            }
            None => Ok(report(None, "lookup")),
        },
    }
}

fn build_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(server) = &cli.server {
        config = config.with_server(server.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if cli.insecure {
        config = config.with_insecure_tls(true);
    }
    config
}

fn report(result: Option<String>, operation: &str) -> bool {
    match result {
        Some(value) => {
            println!("{value}");
            true
        }
        None => {
            eprintln!("{operation} failed: the service returned no result");
            false
        }
    }
}
