//! rationale-rs CLI: build analogy prompt datasets.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rationale_rs::{AnalogyCorpus, ParseMode, RationaleModel};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "rationale-rs")]
#[command(about = "Analogy prompt dataset builder")]
#[command(version)]
struct Cli {
    /// Path to the raw analogy corpus file
    #[arg(short, long, default_value = "data/analogies.txt")]
    analogies: PathBuf,

    /// Output directory for the dataset and summary
    #[arg(short, long, default_value = "outputs")]
    output: PathBuf,

    /// Number of prompts sampled per category
    #[arg(short, long, default_value_t = 10)]
    samples: usize,

    /// Random seed for pair sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Model ID whose tokenizer filters out multi-token pairs
    /// (e.g., "gpt2"); no filtering when omitted
    #[arg(short, long)]
    tokenizer: Option<String>,

    /// Truncate unpairable sections instead of failing
    #[arg(long)]
    lenient: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!("=== rationale-rs: analogy prompt dataset builder ===");
    println!("Corpus:  {}", cli.analogies.display());
    println!("Output:  {}", cli.output.display());
    println!("Samples: {} per category (seed {})", cli.samples, cli.seed);

    let mode = if cli.lenient {
        ParseMode::Lenient
    } else {
        ParseMode::Strict
    };

    info!("Parsing analogy corpus...");
    let raw = std::fs::read_to_string(&cli.analogies)?;
    let mut corpus = AnalogyCorpus::parse(&raw, mode)?.with_templates()?;
    info!(
        "Corpus: {} categories, {} pairs",
        corpus.len(),
        corpus.categories().iter().map(|c| c.len()).sum::<usize>()
    );

    if let Some(model_id) = &cli.tokenizer {
        info!("Filtering to single-token pairs with `{}` tokenizer", model_id);
        let tokenizer = RationaleModel::tokenizer_from_pretrained(model_id)?;
        corpus.retain_single_token_pairs(&tokenizer)?;
        info!(
            "After filtering: {} pairs",
            corpus.categories().iter().map(|c| c.len()).sum::<usize>()
        );
    }

    let records = corpus.build_prompt_records(cli.samples, cli.seed)?;

    std::fs::create_dir_all(&cli.output)?;
    let dataset_path = rationale_rs::save(&records, cli.output.join("analogy_prompts"))?;
    info!("Dataset saved to {}", dataset_path.display());

    // Per-category prompt counts, human-readable
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *counts.entry(record.category.as_str()).or_default() += 1;
    }
    let summary_path = cli.output.join("dataset_summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&counts)?)?;
    info!("Summary saved to {}", summary_path.display());

    println!("\n=== Dataset ===");
    for (category, count) in &counts {
        println!("{category:32} {count:4} prompts");
    }
    println!("\nTotal: {} prompts", records.len());

    Ok(())
}
