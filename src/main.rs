// src/main.rs
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod aggregator;
mod categorizer;
mod config;
mod error;
mod export;
mod extractor;
mod models;
mod patterns;
mod report;
mod research;

use config::{load_config, Config, OutputConfig};
use error::Result;
use models::ResearchRequest;
use research::{ContactFinder, ResearchOutcome};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            let mut config = Config::default();
            config.providers = config.providers.with_env_keys();
            config
        }
    };

    // Setup logging
    let directive = format!("contact_scout={}", config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse().unwrap()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: contact-scout <company> <website> [country] [industry]");
        std::process::exit(2);
    }
    let request = ResearchRequest {
        company: args[0].clone(),
        website: args[1].clone(),
        country: args.get(2).cloned().unwrap_or_default(),
        industry: args.get(3).cloned().unwrap_or_default(),
    };

    // Create output directory
    tokio::fs::create_dir_all(&config.output.directory).await?;

    let output = config.output.clone();
    let finder = ContactFinder::new(config);

    // Add graceful shutdown
    tokio::select! {
        outcome = finder.research(request) => {
            write_outputs(&outcome, &output).await?;
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}

async fn write_outputs(outcome: &ResearchOutcome, output: &OutputConfig) -> Result<()> {
    let base = export::filename_base(&outcome.request.company);
    let csv_path = format!("{}/{}.csv", output.directory, base);
    let json_path = format!("{}/{}.json", output.directory, base);

    let records = export::build_records(outcome);
    export::export_to_csv(&records, &csv_path).await?;
    export::export_to_json(outcome, &json_path, output.pretty_json).await?;

    for (category, emails) in &outcome.categories {
        info!("  {}: {} emails", category.as_str(), emails.len());
    }
    info!(
        "Exported {} contacts ({} emails, {} phones) to {} and {}",
        outcome.aggregate.total_contacts(),
        outcome.aggregate.emails.len(),
        outcome.aggregate.phones.len(),
        csv_path,
        json_path
    );

    Ok(())
}
