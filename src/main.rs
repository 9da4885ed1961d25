use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use product_recommender::{Recommendation, Recommender, RecommenderConfig, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "product-recommender",
    about = "Train and query a TF-IDF product recommender"
)]
struct Cli {
    /// YAML config file; defaults apply when omitted
    #[arg(long, global = true, env = "PRODUCT_RECOMMENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the catalog CSV path
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Override the model artifact path
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a model over the catalog and save it
    Train,
    /// Items similar to a catalog product
    Similar {
        product_id: String,
        #[arg(long, allow_negative_numbers = true)]
        top_n: Option<i64>,
    },
    /// Items matching free text
    Query {
        text: String,
        #[arg(long, allow_negative_numbers = true)]
        top_n: Option<i64>,
    },
    /// Homepage picks from the configured featured query
    Featured {
        #[arg(long, allow_negative_numbers = true)]
        top_n: Option<i64>,
    },
}

fn load_config(cli: &Cli) -> Result<RecommenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RecommenderConfig::load(path)?,
        None => RecommenderConfig::default(),
    };
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }
    Ok(config)
}

fn print_json(recs: &[Recommendation]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, recs)?;
    writeln!(out)
}

fn run(cli: Cli) -> std::result::Result<(), Box<dyn Error>> {
    let config = load_config(&cli)?;
    match cli.command {
        Command::Train => {
            let recommender = Recommender::train(config)?;
            println!("{}", recommender.model().summary());
        }
        Command::Similar { product_id, top_n } => {
            let recommender = Recommender::open(config)?;
            print_json(&recommender.similar(&product_id, top_n))?;
        }
        Command::Query { text, top_n } => {
            let recommender = Recommender::open(config)?;
            print_json(&recommender.from_text(&text, top_n))?;
        }
        Command::Featured { top_n } => {
            let recommender = Recommender::open(config)?;
            print_json(&recommender.featured(top_n))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
