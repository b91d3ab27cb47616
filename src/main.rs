//! agriprice - modal price estimation from the command line
//!
//! # Usage
//! ```sh
//! agriprice wheat punjab ludhiana ludhiana_mandi
//! agriprice --batch queries.csv --metrics
//! ```
//!
//! # Environment Variables
//! - `DATASET_PATH` - Reference price table (default: data/agricrop.csv)
//! - `ENCODERS_PATH` - Fitted encoder set (default: data/label_encoders.json)
//! - `MODEL_PATH` - Trained random forest (default: data/best_model.json)
//! - `OBSERVABILITY_ENABLED` - Collect prediction metrics (default: true)

use agriprice::application::pricing::Prediction;
use agriprice::application::system::PricingSystem;
use agriprice::config::Config;
use agriprice::domain::errors::PredictionError;
use agriprice::domain::pricing::PriceQuery;
use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Commodity name, e.g. "wheat"
    commodity: Option<String>,
    /// State, e.g. "punjab"
    state: Option<String>,
    /// District, e.g. "ludhiana"
    district: Option<String>,
    /// Market, e.g. "ludhiana_mandi"
    market: Option<String>,

    /// CSV of queries with columns commodity_name,state,district,market
    #[arg(long, conflicts_with = "commodity")]
    batch: Option<PathBuf>,

    /// Override DATASET_PATH
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Override ENCODERS_PATH
    #[arg(long)]
    encoders: Option<PathBuf>,

    /// Override MODEL_PATH
    #[arg(long)]
    model: Option<PathBuf>,

    /// Print the feature vector and fallback tier with each prediction
    #[arg(long)]
    explain: bool,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    metrics: bool,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    commodity_name: String,
    state: String,
    district: String,
    market: String,
}

fn render(query: &PriceQuery, result: &Result<Prediction, PredictionError>, explain: bool) -> String {
    let label = format!(
        "{}, {}, {}, {}",
        query.commodity(),
        query.state(),
        query.district(),
        query.market()
    );
    match result {
        Ok(p) if explain => format!(
            "{}: {:.2} (features={:?}, aggregates={})",
            label,
            p.price,
            p.features.to_vec(),
            p.aggregates.tier.as_str()
        ),
        Ok(p) => format!("{}: {:.2}", label, p.price),
        Err(e) => format!("{}: {}", label, e.user_message()),
    }
}

fn read_queries(path: &Path) -> Result<Vec<PriceQuery>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Failed to open batch file {:?}", path))?;

    rdr.deserialize()
        .map(|row| {
            let row: QueryRow = row.context("Malformed batch row")?;
            Ok(PriceQuery::new(
                &row.commodity_name,
                &row.state,
                &row.district,
                &row.market,
            ))
        })
        .collect()
}

fn main() -> Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stderr, so predictions on stdout stay parseable)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = args.dataset.clone() {
        config.dataset_path = path;
    }
    if let Some(path) = args.encoders.clone() {
        config.encoders_path = path;
    }
    if let Some(path) = args.model.clone() {
        config.model_path = path;
    }
    if args.metrics {
        config.observability_enabled = true;
    }

    info!("agriprice {} starting...", env!("CARGO_PKG_VERSION"));
    let system = PricingSystem::build(config)?;
    let pipeline = system.pipeline();

    let queries = match (&args.batch, &args.commodity, &args.state, &args.district, &args.market) {
        (Some(path), ..) => read_queries(path)?,
        (None, Some(c), Some(s), Some(d), Some(m)) => vec![PriceQuery::new(c, s, d, m)],
        _ => bail!("Provide COMMODITY STATE DISTRICT MARKET, or --batch <csv>"),
    };

    let results = pipeline.predict_batch(&queries);
    let mut rejected = 0usize;
    for (query, result) in queries.iter().zip(&results) {
        if result.is_err() {
            rejected += 1;
        }
        println!("{}", render(query, result, args.explain));
    }
    info!("{} predictions, {} rejected", results.len(), rejected);

    if args.metrics {
        if let Some(metrics) = &system.metrics {
            print!("{}", metrics.render());
        }
    }

    Ok(if rejected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
