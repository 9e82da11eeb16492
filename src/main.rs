//! # Graphmize CLI
//!
//! Binary entry point for the `graphmize` command-line tool.
//!
//! It parses arguments with `clap` and dispatches to the matching command.
//! Errors propagate to `main`, which prints them on stderr and exits with
//! status 1. Graph building and rendering live in the `graphmize` library;
//! this binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
