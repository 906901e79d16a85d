//! overload-cli
//!
//! Run with: `overload-cli [--verbose] <COMMAND>`
//!
//! - `classify <JSON>...`: 各 JSON 値の TypeTag を表示
//! - `dispatch --signature "String,Number" --arity 1 --fallback -- <JSON>...`:
//!   その場で dispatcher を組み立てて呼び出し、選ばれた entry を表示

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use overload_core::{DispatchError, Dispatcher, Function, TypeTag, Value, classify};

#[derive(Parser)]
#[command(name = "overload-cli")]
#[command(about = "Classify values and try out runtime argument dispatch")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the type tag of each JSON value
    Classify {
        #[arg(value_name = "JSON", required = true)]
        values: Vec<String>,
    },
    /// Build a dispatcher from the options and call it with the JSON arguments
    Dispatch {
        /// Comma-separated type names, one entry per flag (empty for no arguments)
        #[arg(short, long = "signature", value_name = "NAMES")]
        signatures: Vec<String>,

        /// Argument counts, one entry per flag
        #[arg(short, long = "arity", value_name = "N")]
        arities: Vec<usize>,

        /// Register a fallback
        #[arg(short, long)]
        fallback: bool,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,

        #[arg(value_name = "JSON", last = true)]
        args: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
struct Classified {
    value: serde_json::Value,
    tag: TypeTag,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Classify { values } => {
            for raw in values {
                let json = parse_json(&raw)?;
                let tag = classify(&Value::from(json.clone()));
                println!("{}", serde_json::to_string(&Classified { value: json, tag })?);
            }
            Ok(())
        }
        Commands::Dispatch {
            signatures,
            arities,
            fallback,
            json,
            args,
        } => {
            let dispatcher = build_dispatcher(&signatures, &arities, fallback)?;
            info!(
                dispatcher = %dispatcher.id(),
                signatures = dispatcher.signature_count(),
                arities = dispatcher.arity_count(),
                "dispatcher ready"
            );

            let args = args
                .iter()
                .map(|raw| parse_json(raw).map(Value::from))
                .collect::<Result<Vec<_>>>()?;

            match dispatcher.invoke(&Value::Null, &args) {
                Ok(result) if json => println!("{}", result.to_json()),
                Ok(result) => println!("{}", result.as_str().unwrap_or_default()),
                Err(e @ DispatchError::NoMatch { .. }) => return Err(e).context("dispatch failed"),
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }
    }
}

fn parse_json(raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw).with_context(|| format!("invalid JSON argument: {raw}"))
}

/// Every implementation returns a label naming the entry that won.
fn build_dispatcher(signatures: &[String], arities: &[usize], fallback: bool) -> Result<Dispatcher> {
    let mut dispatcher = Dispatcher::new();

    for (index, spec) in signatures.iter().enumerate() {
        let names = split_names(spec);
        debug!(entry = index, ?names, "registering signature");
        dispatcher
            .by_names(&names[..])?
            .using(Function::constant(format!("signature[{index}]: ({})", names.join(", "))));
    }

    for (index, arity) in arities.iter().enumerate() {
        dispatcher
            .by_arity(*arity)
            .using(Function::constant(format!("arity[{index}]: {arity}")));
    }

    if fallback {
        dispatcher.on_fallback(Function::constant("fallback"));
    }

    Ok(dispatcher)
}

fn split_names(spec: &str) -> Vec<&str> {
    spec.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
