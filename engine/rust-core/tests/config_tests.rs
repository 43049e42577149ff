mod common;

use serial_test::serial;

use civico_engine::models::quiz::QuizTier;
use civico_engine::{Config, EngineState};

#[test]
#[serial]
fn config_defaults_cover_a_local_setup() {
    std::env::set_var("APP_ENV", "test");
    std::env::remove_var("API_BASE_URL");

    let config = Config::load().expect("Failed to load configuration");
    assert_eq!(config.api_base_url, "http://localhost:3001/api");
    assert_eq!(config.request_timeout_seconds, 10);
    assert_eq!(config.tick_interval_ms, 1000);

    // Balancing tables ship with the observed defaults.
    let master = config.tiers.config_for(QuizTier::Master);
    assert_eq!(master.base_points, 50);
    assert_eq!(master.streak_multiplier, 10);
    assert_eq!(master.time_limit_seconds, 20);
    assert_eq!(config.classification.label_for(95), "Excelente");

    std::env::remove_var("APP_ENV");
}

#[test]
#[serial]
fn config_honors_environment_overrides() {
    std::env::set_var("APP_ENV", "test");
    std::env::set_var("API_BASE_URL", "https://api.example.org/v1");

    let config = Config::load().expect("Failed to load configuration");
    assert_eq!(config.api_base_url, "https://api.example.org/v1");

    std::env::remove_var("API_BASE_URL");
    std::env::remove_var("APP_ENV");
}

#[tokio::test]
#[serial]
async fn engine_state_wires_services_from_config() {
    common::init_tracing();
    std::env::set_var("APP_ENV", "test");

    let config = Config::load().expect("Failed to load configuration");
    let state = EngineState::new(config).expect("Failed to initialize engine state");

    // Services are constructed over the shared API client; no network
    // traffic happens until an operation is invoked.
    let _rsvp = state.rsvp();
    let _quiz = state.quiz();

    std::env::remove_var("APP_ENV");
}
