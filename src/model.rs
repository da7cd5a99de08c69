// Core structs: CarRecord plus the error types shared across modules.
use serde::Serialize;
use thiserror::Error;

/// Fallback value substituted whenever a detail-page field is absent.
pub const UNKNOWN: &str = "unknown";

/// One scraped car advertisement. All fields are kept as raw trimmed
/// strings; validation of prices, mileage etc. happens downstream of the
/// CSV, not here.
#[derive(Debug, Clone, Serialize)]
pub struct CarRecord {
    pub url: String,
    pub brand: String,
    pub model: String,
    pub price: String,
    pub first_registration: String,
    pub mileage: String,
    pub fuel_type: String,
    pub color: String,
    pub gearbox: String,
    pub power: String,
    pub engine_size: String,
    pub seller: String,
    pub location: String,
    pub body_type: String,
    pub doors: String,
    pub seats: String,
    pub drivetrain: String,
    pub co2_emission: String,
    pub emission_class: String,
    pub condition: String,
    pub upholstery: String,
    pub upholstery_color: String,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("failed to read model artifact {path}: {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    ArtifactFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("inconsistent model artifact: {0}")]
    InvalidModel(String),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("the following fields are required: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("first registration year {0} is in the future")]
    FutureYear(i32),
}
