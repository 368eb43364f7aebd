//! Prompt command - show what would be sent to the extraction service.

use std::path::PathBuf;

use clap::Args;

use clareia_core::{PlaceholderTextExtractor, PromptBuilder, TextExtractor};

use super::{load_config, read_upload};

/// Arguments for the prompt command.
#[derive(Args)]
pub struct PromptArgs {
    /// Statement file
    #[arg(required = true)]
    input: PathBuf,

    /// Declared media type (default: guessed from the extension)
    #[arg(long)]
    media_type: Option<String>,
}

pub fn run(args: PromptArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let upload = read_upload(&args.input, args.media_type.as_deref(), &config.upload)?;

    let text = PlaceholderTextExtractor::new().extract_text(&upload);
    let builder = PromptBuilder::new();

    eprintln!("prompt version {}", builder.version());
    println!("{}", builder.build(&text));

    Ok(())
}
