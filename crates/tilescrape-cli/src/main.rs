mod offline;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilescrape_core::ProductType;
use tracing_subscriber::EnvFilter;

use crate::scrape::ScrapeArgs;

#[derive(Debug, Parser)]
#[command(name = "tilescrape")]
#[command(about = "Scrape product tiles from a listing page into a JSON export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Drive a browser through a listing and export the merged products
    Scrape(ScrapeArgs),
    /// Extract products from saved listing HTML files
    Extract {
        /// HTML files, processed in order as consecutive pages
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Only keep these product types (comma-separated, e.g. hoodie,shirt)
        #[arg(long, value_delimiter = ',')]
        types: Vec<ProductType>,
        /// Export path (defaults to TILESCRAPE_OUTPUT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the product type assigned to each title
    Classify {
        #[arg(required = true)]
        titles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = tilescrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape_command(&config, &args).await,
        Commands::Extract {
            files,
            types,
            output,
        } => {
            let output = output.unwrap_or_else(|| config.output_path.clone());
            offline::run_extract(&files, types, &output)
        }
        Commands::Classify { titles } => {
            offline::run_classify(&titles);
            Ok(())
        }
    }
}
