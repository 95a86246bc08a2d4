//! Command-line lookups against the bundled census code lists
//!
//! Usage:
//!   ansi_codes [--json] state <QUERY>
//!   ansi_codes [--json] states
//!   ansi_codes [--json] county <STATE> <COUNTY>
//!   ansi_codes [--json] counties [STATE]
//!
//! Logs go to stderr; set RUST_LOG=debug to see registry load details.

use ansi_codes::document::{self, ToDocument};
use ansi_codes::{County, State};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Look up US census state and county ANSI codes
#[derive(Parser, Debug)]
#[command(name = "ansi_codes")]
#[command(about = "Look up US census state and county ANSI codes")]
struct Args {
    /// Print JSON documents instead of tab-separated lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up one state by code, abbreviation, or name
    State { query: String },
    /// List every state
    States,
    /// Look up one county by code or name within a state
    County { state: String, county: String },
    /// List counties, optionally of one state
    Counties { state: Option<String> },
}

fn state_line(state: &State) -> String {
    format!("{}\t{}\t{}", state.ansi_code(), state.abbreviation(), state.name())
}

fn county_line(county: &County) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        county.state_ansi_code(),
        county.county_ansi_code(),
        county.name(),
        county.short_name(),
        county.designation()
    )
}

fn print_one<T: ToDocument>(entity: &T, json: bool, line: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", document::to_json(entity, true)?);
    } else {
        println!("{}", line(entity));
    }
    Ok(())
}

fn print_all<T: ToDocument>(entities: Vec<&T>, json: bool, line: fn(&T) -> String) -> Result<()> {
    if json {
        let values = entities
            .iter()
            .map(|e| document::to_value(*e, false))
            .collect::<ansi_codes::Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for entity in entities {
            println!("{}", line(entity));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    debug!("{:?}", args);

    match args.command {
        Command::State { query } => print_one(State::find(query)?, args.json, state_line)?,
        Command::States => print_all(State::all()?, args.json, state_line)?,
        Command::County { state, county } => {
            print_one(County::find(state, county)?, args.json, county_line)?
        }
        Command::Counties { state: None } => print_all(County::all()?, args.json, county_line)?,
        Command::Counties { state: Some(query) } => {
            let state = State::find(query)?;
            print_all(state.counties()?, args.json, county_line)?
        }
    }

    Ok(())
}
