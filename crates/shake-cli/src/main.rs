//! Clawshake CLI binary entrypoint.
//!
//! This is the main entry point for the `clawshake` command-line tool.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shake_cli::cli::{Cli, Commands};
use shake_cli::commands::{
    ConfigCommand, CounterCommand, EvaluateCommand, RankCommand, resolve_config,
};
use shake_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    match run(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run<W: Write>(cli: Cli, writer: &mut W) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format);
    let config = resolve_config(cli.config.as_deref(), cli.max_rounds)
        .context("failed to load engine configuration")?;
    tracing::debug!(?config, "engine configuration loaded");

    match cli.command {
        Commands::Evaluate(args) => EvaluateCommand::new(&config)
            .execute(writer, &format, &args)
            .context("evaluate failed")?,
        Commands::Rank(args) => RankCommand::new()
            .execute(writer, &format, &args)
            .context("rank failed")?,
        Commands::Counter(args) => CounterCommand::new(&config)
            .execute(writer, &format, &args)
            .context("counter failed")?,
        Commands::Config => ConfigCommand::new(&config)
            .execute(writer, &format)
            .context("config failed")?,
    }

    Ok(())
}
