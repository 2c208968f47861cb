mod config;
mod db;
mod error;
mod extract;
mod fetch;
mod migrate;
mod paginate;
mod pipeline;
mod sink;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use config::Config;
use extract::api::ApiExtractor;
use extract::html::{HtmlExtractor, SelectorSchema};
use fetch::{ApiFetcher, HtmlFetcher};
use sink::CsvSink;

#[derive(Parser)]
#[command(name = "mudah_scraper", about = "Car listing scraper for mudah.my")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape listings via the search JSON API
    ScrapeApi {
        /// Max records to collect (default: config/env)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Scrape listings from the rendered HTML pages
    ScrapeHtml {
        /// Max records to collect (default: config/env)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Load the scraped CSV into the database
    Migrate {
        /// CSV file to load (default: the scrape output path)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show database row counts
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut cfg = Config::from_env();

    let result = match cli.command {
        Commands::ScrapeApi { limit } => {
            if let Some(n) = limit {
                cfg.max_records = n;
            }
            let fetcher = ApiFetcher::new(&cfg)?;
            let mut sink = CsvSink::new(&cfg.output_path);
            let outcome =
                pipeline::run_scrape(fetcher, ApiExtractor, &mut sink, cfg.max_records, cfg.max_pages)
                    .await?;
            println!(
                "Scraped {} records over {} pages -> {}",
                outcome.records,
                outcome.pages,
                cfg.output_path.display()
            );
            Ok(())
        }
        Commands::ScrapeHtml { limit } => {
            if let Some(n) = limit {
                cfg.max_records = n;
            }
            let fetcher = HtmlFetcher::new(&cfg)?;
            let extractor = HtmlExtractor::new(&SelectorSchema::default())?;
            let mut sink = CsvSink::new(&cfg.output_path);
            let outcome =
                pipeline::run_scrape(fetcher, extractor, &mut sink, cfg.max_records, cfg.max_pages)
                    .await?;
            println!(
                "Scraped {} records over {} pages -> {}",
                outcome.records,
                outcome.pages,
                cfg.output_path.display()
            );
            Ok(())
        }
        Commands::Migrate { file } => {
            let path = file.unwrap_or_else(|| cfg.output_path.clone());
            if !path.exists() {
                println!("{} not found. Run a scrape command first.", path.display());
                return Ok(());
            }
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let counts = migrate::load(&conn, &path)?;
            println!(
                "Inserted {} brands, {} models, {} cars.",
                counts.brands, counts.models, counts.cars
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Brands: {}", s.brands);
            println!("Models: {}", s.models);
            println!("Cars:   {}", s.cars);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}
