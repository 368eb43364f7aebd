//! Demo command - print an example statement.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use clareia_core::{FallbackKind, fallback};

use super::emit;
use super::process::{OutputFormat, format_statement};

/// Arguments for the demo command.
#[derive(Args)]
pub struct DemoArgs {
    /// Example dataset (bank-statement or utility-bill)
    #[arg(short, long, default_value = "bank-statement")]
    dataset: FallbackKind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    info!("Printing {} example dataset", args.dataset);

    let statement = fallback(args.dataset);
    let output = format_statement(&statement, args.format)?;
    emit(&output, args.output.as_deref())
}
