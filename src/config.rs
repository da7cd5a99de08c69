use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub brands: Vec<String>,
    #[serde(default = "default_pages_per_brand")]
    pub pages_per_brand: u32,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_output_csv")]
    pub output_csv: String,
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_feature_names_path")]
    pub feature_names_path: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_pages_per_brand() -> u32 {
    20
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_output_csv() -> String {
    "data/cars.csv".to_string()
}

fn default_model_path() -> String {
    "models/price_model.json".to_string()
}

fn default_feature_names_path() -> String {
    "models/feature_names.json".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
