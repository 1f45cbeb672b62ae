//! Command-line front end for trust-aware path selection
//!
//! Reads a consensus snapshot, a client request and a geolocation source
//! (MaxMind DB or prefix table), then prints JSON on stdout. Logs go to
//! stderr.

use allypath_cli::{
    guard_reports, load_consensus, load_request, ClientRequest, GeoSource, PathReport,
    SelectionConfig,
};
use allypath_core::{PathSelector, RelayRanker};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "allypath")]
#[command(about = "Allypath - Trust-Aware Relay Path Selection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Select a guard, middle and exit relay
    Select(Inputs),

    /// Show the tiered guard ranking for the client
    Guards(Inputs),
}

#[derive(Args)]
struct Inputs {
    /// Consensus snapshot (JSON array of relays)
    #[arg(long)]
    consensus: PathBuf,

    /// Client request (JSON with Client, Destination, Alliances)
    #[arg(long)]
    request: PathBuf,

    /// Geolocation: a `.mmdb` MaxMind database or a TOML prefix table
    #[arg(long)]
    geo: PathBuf,

    /// Tiering parameters (TOML); defaults apply when omitted
    #[arg(long)]
    params: Option<PathBuf>,

    /// Seed for a reproducible selection
    #[arg(long)]
    seed: Option<u64>,
}

struct Session {
    request: ClientRequest,
    config: SelectionConfig,
    selector: PathSelector<GeoSource, ChaCha20Rng>,
}

impl Inputs {
    fn load(&self) -> Result<Session> {
        let config = match &self.params {
            Some(path) => SelectionConfig::load(path)?,
            None => SelectionConfig::default(),
        };
        for warning in config.check() {
            warn!("{warning}");
        }

        let request = load_request(&self.request)?;
        let alliances = request
            .alliances()
            .with_context(|| format!("invalid alliance in {}", self.request.display()))?;
        let relays = load_consensus(&self.consensus)?;
        let geo = GeoSource::load(&self.geo)?;

        let seed = self.seed.unwrap_or_else(rand::random);
        debug!(seed, "seeding selector");

        Ok(Session {
            request,
            config,
            selector: PathSelector::new(alliances, relays, geo, ChaCha20Rng::seed_from_u64(seed)),
        })
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Select(inputs) => select(&inputs),
        Commands::Guards(inputs) => guards(&inputs),
    }
}

fn select(inputs: &Inputs) -> Result<ExitCode> {
    let mut session = inputs.load()?;
    let request = &session.request;

    match session.selector.select_path(
        &request.client,
        &request.destination,
        &session.config.guard,
        &session.config.exit,
    ) {
        Ok(path) => {
            println!("{}", serde_json::to_string_pretty(&PathReport::from(&path))?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            println!("{error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn guards(inputs: &Inputs) -> Result<ExitCode> {
    let session = inputs.load()?;
    let scores = session
        .selector
        .guard_security(&session.request.client, session.selector.relays());
    let reports = guard_reports(&scores, &RelayRanker::new(session.config.guard));

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(ExitCode::SUCCESS)
}
