//! Command line runner for the cross-validation workflow steps
//!
//! Reads a step's input event as JSON from a file or stdin, runs the step
//! against a local directory standing in for object storage, and prints the
//! resulting event to stdout. Logs go to stderr, filtered by `RUST_LOG`.
//!
//! # Commands
//!
//! - `kfold bootstrap` - Validate the event and derive run and job names
//! - `kfold split` - Write the folds and attach their descriptors
//! - `kfold prepare` - Customize the training job of one fold

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kfold_store::LocalRecordStore;
use kfold_workflow::{
    prepare_split, split_dataset, Bootstrapper, Event, InMemoryTracker, PrepareEvent,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kfold")]
#[command(about = "K-fold cross-validation workflow steps", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EventArgs {
    /// Event JSON file; stdin when omitted
    #[arg(long)]
    event: Option<PathBuf>,

    /// Pretty-print the output event
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the input and derive run, experiment and job names
    Bootstrap {
        #[command(flatten)]
        args: EventArgs,

        /// Fixed run id instead of the current UTC time
        #[arg(long)]
        run_id: Option<String>,
    },

    /// Partition the input dataset and write the folds
    Split {
        #[command(flatten)]
        args: EventArgs,

        /// Directory standing in for object storage
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Fill in one fold's hyperparameters, job name and tags
    Prepare {
        #[command(flatten)]
        args: EventArgs,
    },
}

fn read_event(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read event from {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read event from stdin")?;
            Ok(text)
        }
    }
}

fn emit<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bootstrap { args, run_id } => {
            let event = Event::from_json(&read_event(args.event.as_deref())?)?;
            let bootstrapper = match run_id {
                Some(run_id) => Bootstrapper::new().with_run_id(run_id),
                None => Bootstrapper::new(),
            };
            let event = bootstrapper.run(event, &mut InMemoryTracker::new())?;
            emit(&event, args.pretty)
        }
        Commands::Split { args, root } => {
            let event = Event::from_json(&read_event(args.event.as_deref())?)?;
            info!(root = %root.display(), "using local store");
            let mut store = LocalRecordStore::new(&root);
            let event = split_dataset(event, &mut store)?;
            emit(&event, args.pretty)
        }
        Commands::Prepare { args } => {
            let event: PrepareEvent = serde_json::from_str(&read_event(args.event.as_deref())?)
                .context("invalid prepare event")?;
            emit(&prepare_split(event)?, args.pretty)
        }
    }
}
