use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use sieve_plan::cli::{self, CliError};
use sieve_plan::metadata::SatisfactionSets;

#[derive(ClapParser)]
#[command(name = "sieve")]
#[command(about = "Sieve - normalization and analysis for boolean filter predicates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a predicate and print the canonical form
    Normalize {
        /// The predicate (reads from stdin if not provided)
        query: Option<String>,

        /// Field metadata JSON file
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Plan configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Normalize a predicate and print analysis verdicts as JSON
    Analyze {
        /// The predicate (reads from stdin if not provided)
        query: Option<String>,

        /// Field metadata JSON file
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Plan configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Satisfaction field sets JSON file
        #[arg(short, long)]
        sets: Option<PathBuf>,
    },

    /// Validate syntax, markers, and regex patterns without planning
    Check {
        /// The predicate (reads from stdin if not provided)
        query: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            query,
            metadata,
            config,
        } => run_normalize(query, metadata, config),
        Commands::Analyze {
            query,
            metadata,
            config,
            sets,
        } => run_analyze(query, metadata, config, sets),
        Commands::Check { query } => run_check(query),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_normalize(
    query: Option<String>,
    metadata: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let query = read_query(query)?;
    let planner = cli::load_planner(metadata.as_deref(), config.as_deref())?;
    let normalized = cli::execute_normalize(&planner, &query)?;
    println!("{}", normalized.tree);
    Ok(())
}

fn run_analyze(
    query: Option<String>,
    metadata: Option<PathBuf>,
    config: Option<PathBuf>,
    sets: Option<PathBuf>,
) -> Result<(), CliError> {
    let query = read_query(query)?;
    let planner = cli::load_planner(metadata.as_deref(), config.as_deref())?;
    let sets = match sets {
        Some(path) => cli::load_json::<SatisfactionSets>(&path)?,
        None => SatisfactionSets::new(),
    };
    let report = cli::execute_analyze(&planner, &sets, &query)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_check(query: Option<String>) -> Result<(), CliError> {
    let query = read_query(query)?;
    cli::execute_check(&query)?;
    println!("ok");
    Ok(())
}

/// Take the query from the argument, or from stdin when piped.
fn read_query(query: Option<String>) -> Result<String, CliError> {
    if let Some(query) = query {
        return Ok(query);
    }
    if atty::is(atty::Stream::Stdin) {
        return Err(CliError::NoInput);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err(CliError::NoInput);
    }
    Ok(trimmed.to_string())
}
