mod bootstrap_helpers;
mod cli_args;
mod dispatch_command;
mod prompt_command;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::{Cli, Commands};
use crate::dispatch_command::execute_dispatch_command;
use crate::prompt_command::execute_prompt_command;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("failed to serialize command output")?;
    println!("{rendered}");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Dispatch(args) => print_json(&execute_dispatch_command(args)?),
        Commands::Prompt(args) => print_json(&execute_prompt_command(args)?),
    }
}
