mod config;
mod crawler;
mod deeplink;
mod fetch;
mod form;
mod model;
mod parser;
mod predictor;
mod server;
mod store;

use config::{AppConfig, load_config};
use crawler::Crawler;
use fetch::HttpFetcher;
use predictor::PriceModel;
use store::CsvStore;

use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {e}");
            return;
        }
    };

    let mode = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());
    match mode.as_str() {
        "scrape" => run_scrape(&config).await,
        "serve" => run_serve(&config).await,
        other => error!("Unknown mode '{other}', expected 'scrape' or 'serve'."),
    }
}

/// Crawls every configured brand once and appends the extracted records to
/// the output CSV.
async fn run_scrape(config: &AppConfig) {
    let fetcher = match HttpFetcher::new() {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            return;
        }
    };
    let crawler = Crawler::new(fetcher, config.pages_per_brand, config.request_delay_ms);

    let mut store = match CsvStore::create(&config.output_csv) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open {}: {e}", config.output_csv);
            return;
        }
    };

    for brand in &config.brands {
        info!("Crawling brand: {brand}");
        let records = crawler.crawl_brand(brand).await;
        info!("Extracted {} records for {brand}", records.len());

        for record in &records {
            if let Err(e) = store.append(record) {
                warn!("CSV write error: {e}");
            }
        }
        if let Err(e) = store.flush() {
            warn!("CSV flush error: {e}");
        }
    }

    info!("Scrape finished, records written to {}", config.output_csv);
}

/// Loads the serialized model artifacts and runs the prediction API.
async fn run_serve(config: &AppConfig) {
    let model = match PriceModel::load(&config.model_path, &config.feature_names_path) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            error!("Model load error: {e}");
            return;
        }
    };
    info!(
        "Loaded price model with {} feature columns",
        model.feature_names().len()
    );

    if let Err(e) = server::serve(&config.listen_addr, model).await {
        error!("Server error: {e}");
    }
}
