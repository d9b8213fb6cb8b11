//! Cartera CLI binary.
//!
//! Builds a portfolio from a predictions table and a covariance matrix and
//! prints it as JSON.

mod cmd;
mod data;

use anyhow::Result;
use cartera::CandidateOrder;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cartera")]
#[command(about = "Greedy constrained mean-variance portfolio builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Log candidate evaluations (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select assets and weights
    Optimize {
        /// Risk aversion (lambda), must be positive
        #[arg(allow_negative_numbers = true)]
        lambda: f64,

        /// Forecast horizon in months, matching a return_{h}m column
        horizon: u32,

        /// Number of assets to hold
        portfolio_size: usize,

        /// Predictions CSV with a ticker column and return_{h}m columns
        #[arg(short, long)]
        predictions: PathBuf,

        /// Covariance matrix (.npy or .csv), ordered like the predictions
        #[arg(short, long)]
        covariance: PathBuf,

        /// Worker threads (defaults to available parallelism minus one)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Solver convergence tolerance on the objective
        #[arg(long, default_value = "1e-8")]
        ftol: f64,

        /// Solver iteration cap per candidate
        #[arg(long, default_value = "100")]
        max_iter: u32,

        /// Candidate order, which decides ties
        #[arg(long, value_enum, default_value = "universe")]
        order: Order,

        /// Include the audit trail and solver status in the output
        #[arg(long)]
        full: bool,
    },

    /// List the horizons available in a predictions table
    Horizons {
        /// Predictions CSV
        #[arg(short, long)]
        predictions: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    /// Row order of the predictions table
    Universe,
    /// Alphabetical by ticker
    Ticker,
}

impl From<Order> for CandidateOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Universe => Self::Universe,
            Order::Ticker => Self::Ticker,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli.command)
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Optimize {
            lambda,
            horizon,
            portfolio_size,
            predictions,
            covariance,
            workers,
            ftol,
            max_iter,
            order,
            full,
        } => {
            let args = cmd::optimize::OptimizeArgs {
                lambda,
                horizon,
                portfolio_size,
                predictions,
                covariance,
                workers,
                ftol,
                max_iter,
                order: order.into(),
                full,
            };
            let report = cmd::optimize::optimize(&args)?;
            println!("{}", report);
        }
        Commands::Horizons { predictions } => {
            cmd::horizons::list_horizons(&predictions)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbose: bool) {
    let default = if verbose { "cartera=debug" } else { "cartera=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}
