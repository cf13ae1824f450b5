use anyhow::{Context, Result};
use clap::Parser;
use reel_canon::canon::ScorerKind;
use reel_canon::config::AppConfig;
use reel_canon::pipeline::{self, CleaningPipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reel-canon")]
#[command(about = "Clean a movie dataset and canonicalize its production company names")]
struct Args {
    /// Input CSV file
    #[arg(short, long, default_value = "data/rotten_tomatoes_movies.csv")]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "data/rotten_tomatoes_movies_clean.csv")]
    output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Similarity cutoff (0-100), overrides config and REEL_CANON_CUTOFF
    #[arg(long)]
    cutoff: Option<i64>,

    /// Column to canonicalize
    #[arg(long)]
    column: Option<String>,

    /// Scoring algorithm: token_sort_ratio, token_sort_levenshtein, token_sort_jaro_winkler
    #[arg(long)]
    scorer: Option<String>,

    /// Resolve values in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())
        .with_context(|| format!("Failed to load configuration {:?}", args.config))?;
    config.apply_env()?;
    if let Some(cutoff) = args.cutoff {
        config.canon.cutoff = cutoff;
    }
    if let Some(column) = args.column {
        config.pipeline.company_column = column;
    }
    if let Some(scorer) = args.scorer.as_deref() {
        config.canon.scorer = ScorerKind::parse(scorer)
            .with_context(|| format!("Unknown scorer: {}", scorer))?;
    }
    if args.parallel {
        config.canon.parallel = true;
    }

    let cleaner = CleaningPipeline::new(&config)?;

    info!("reel-canon starting...");
    let df = pipeline::read_csv(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut outcome = cleaner.run(df)?;
    pipeline::write_csv(&mut outcome.frame, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("\n=== Cleaning Summary ===");
    println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    println!("\n{}", outcome.frame.head(Some(10)));

    Ok(())
}
