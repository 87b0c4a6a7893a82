use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub url: String,
    #[serde(default)]
    pub floor_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_cycle_cooldown")]
    pub cycle_cooldown_seconds: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_backoff_min")]
    pub backoff_min_seconds: f64,
    #[serde(default = "default_backoff_max")]
    pub backoff_max_seconds: f64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

fn default_poll_interval() -> u64 {
    86_400
}

fn default_cycle_cooldown() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    10
}

fn default_backoff_min() -> f64 {
    5.0
}

fn default_backoff_max() -> f64 {
    10.0
}

fn default_data_dir() -> String {
    "data".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
