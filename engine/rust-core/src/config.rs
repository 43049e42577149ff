use serde::Deserialize;
use std::env;

use crate::models::quiz::{ClassificationTable, TierTable};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub tick_interval_ms: u64,
    pub tiers: TierTable,
    pub classification: ClassificationTable,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let api_base_url = settings
            .get_string("api.base_url")
            .or_else(|_| env::var("API_BASE_URL"))
            .unwrap_or_else(|_| "http://localhost:3001/api".to_string());

        let request_timeout_seconds = settings
            .get_int("api.request_timeout_seconds")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);

        let tick_interval_ms = settings
            .get_int("quiz.tick_interval_ms")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(1000);

        // Balancing tables ship with observed defaults; deployments may
        // override them wholesale from the config file.
        let tiers = settings
            .get::<TierTable>("quiz.tiers")
            .unwrap_or_default();

        let classification = settings
            .get::<ClassificationTable>("quiz.classification")
            .unwrap_or_default();

        Ok(Config {
            api_base_url,
            request_timeout_seconds,
            tick_interval_ms,
            tiers,
            classification,
        })
    }
}
