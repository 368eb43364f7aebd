//! Process command - explain the line items of a single statement file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use clareia_core::models::statement::{checked_total, format_brl};
use clareia_core::{FallbackKind, PipelineMode, ProcessedStatement, StatementPipeline};

use super::{emit, load_config, read_upload};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Statement file (PDF, JPG, PNG or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Declared media type (default: guessed from the extension)
    #[arg(long)]
    media_type: Option<String>,

    /// Return the example dataset instead of calling the service
    #[arg(long)]
    demo: bool,

    /// Example dataset used in demo mode
    #[arg(long)]
    dataset: Option<FallbackKind>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output, as the web client receives it
    Json,
    /// Plain text read-out
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.demo {
        config.pipeline.mode = PipelineMode::Demo;
    }
    if let Some(dataset) = args.dataset {
        config.pipeline.demo_dataset = dataset;
    }

    let upload = read_upload(&args.input, args.media_type.as_deref(), &config.upload)?;
    let pipeline = StatementPipeline::from_config(&config)?;

    info!("Processing file: {} ({:?} mode)", args.input.display(), pipeline.mode());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Analyzing {}", upload.name));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.process(&upload).await;
    pb.finish_and_clear();

    let statement = result.map_err(|e| {
        eprintln!("{} {}", style("✗").red(), e);
        anyhow::Error::new(e).context(format!("Failed to process {}", args.input.display()))
    })?;

    let output = format_statement(&statement, args.format)?;
    emit(&output, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a statement in the requested format.
pub fn format_statement(statement: &ProcessedStatement, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(statement)?),
        OutputFormat::Text => Ok(format_text(statement)),
    }
}

fn format_text(statement: &ProcessedStatement) -> String {
    let lines = statement.summary_lines();
    let (header, item_lines) = lines.split_at(2);

    let mut output = String::new();
    output.push_str(&format!("{}\n", header.join("\n")));

    match statement.items_total() {
        Some(sum) if sum == statement.total_amount => {}
        Some(sum) => output.push_str(&format!("Soma dos itens: {}\n", format_brl(sum))),
        None => output.push_str("Soma dos itens: fora do intervalo representável\n"),
    }

    output.push('\n');
    for (item, line) in statement.items.iter().zip(item_lines) {
        let marker = if item.flags_avoidable_fee() { " [evitável]" } else { "" };
        output.push_str(&format!("[{}] {}{}\n", item.category_label(), line, marker));
    }

    let avoidable: Vec<_> = statement.avoidable_fees().collect();
    if !avoidable.is_empty() {
        let total = checked_total(avoidable.iter().map(|i| i.amount))
            .map(format_brl)
            .unwrap_or_else(|| "fora do intervalo representável".to_string());
        output.push_str(&format!(
            "\n{} cobrança(s) possivelmente evitável(is): {}\n",
            avoidable.len(),
            total
        ));
    }

    output
}
