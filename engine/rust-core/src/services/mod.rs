use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;

pub struct EngineState {
    pub config: Config,
    pub api: Arc<civic_api::CivicApi>,
}

impl EngineState {
    pub fn new(config: Config) -> Result<Self> {
        let api = Arc::new(civic_api::CivicApi::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_seconds),
        )?);

        tracing::info!("Engine initialized: api_base_url={}", config.api_base_url);

        Ok(Self { config, api })
    }

    pub fn rsvp(&self) -> rsvp_service::RsvpService {
        rsvp_service::RsvpService::new(self.api.clone())
    }

    pub fn quiz(&self) -> quiz_service::QuizService {
        quiz_service::QuizService::new(self.api.clone())
    }
}

pub mod civic_api;
pub mod quiz_engine;
pub mod quiz_service;
pub mod quiz_timer;
pub mod rsvp_service;
