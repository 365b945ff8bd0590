//! RCSUITE CLI
//!
//! Drives RC-step extraction, replay and CRF mutant generation over JSON
//! machine definitions and traces. Results go to stdout as JSON; logs go
//! to stderr.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rcsuite")]
#[command(about = "RCSUITE - Robustness-aware regression suite tooling", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract RC-steps from a machine definition
    Extract {
        /// Path to machine definition
        #[arg(short, long)]
        machine: PathBuf,
        /// Annotate steps with resolved action costs
        #[arg(long)]
        costs: bool,
        /// Bucket steps by source state
        #[arg(long)]
        graph: bool,
        /// Maximum nodes to visit (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_nodes: usize,
    },
    /// Follow events from the initial configuration
    Replay {
        /// Path to machine definition
        #[arg(short, long)]
        machine: PathBuf,
        /// Comma-separated event types
        #[arg(short, long, value_delimiter = ',')]
        events: Vec<String>,
    },
    /// Generate mutants of one CRF kind
    Mutate {
        /// CRF kind: WM, WP or MM
        #[arg(short, long)]
        kind: String,
        /// Number of mutants
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        #[command(flatten)]
        mutation: MutationArgs,
    },
    /// Generate compound mutants applying several kinds in order
    Compound {
        /// Comma-separated CRF kinds
        #[arg(short, long, value_delimiter = ',', required = true)]
        kinds: Vec<String>,
        /// Number of mutants
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        #[command(flatten)]
        mutation: MutationArgs,
    },
}

#[derive(Args)]
struct MutationArgs {
    /// Path to trace
    #[arg(short, long)]
    trace: PathBuf,
    /// Path to mutation config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the injection rate
    #[arg(long)]
    rate: Option<f64>,
    /// Override with explicit comma-separated positions
    #[arg(long, value_delimiter = ',')]
    positions: Option<Vec<usize>>,
    /// Seed: an integer, or any string to hash (random if omitted)
    #[arg(short, long)]
    seed: Option<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rcsuite=debug" } else { "rcsuite=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_mutation(kinds: Vec<String>, count: usize, args: MutationArgs) -> Result<()> {
    let trace = commands::load_trace(&args.trace)?;
    let mut config = commands::load_config(args.config.as_deref())?;
    if let Some(rate) = args.rate {
        config = config.with_injection_rate(rate);
    }
    if let Some(positions) = args.positions {
        config = config.with_injection_positions(positions);
    }
    let seed = commands::parse_seed(args.seed.as_deref());
    let report = commands::mutate(&trace, &kinds, count, config, seed)?;
    print_json(&report)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            machine,
            costs,
            graph,
            max_nodes,
        } => {
            let machine = commands::load_machine(&machine)?;
            print_json(&commands::extract(&machine, costs, max_nodes, graph)?)
        }
        Commands::Replay { machine, events } => {
            let machine = commands::load_machine(&machine)?;
            print_json(&commands::replay(machine, &events)?)
        }
        Commands::Mutate {
            kind,
            count,
            mutation,
        } => run_mutation(vec![kind], count, mutation),
        Commands::Compound {
            kinds,
            count,
            mutation,
        } => run_mutation(kinds, count, mutation),
    }
}
