//! show-config command tests

use docingest::cli::commands::config::{execute, ConfigArgs, ConfigResponse};
use docingest::cli::OutputFormat;
use docingest::core::config::Config;
use serial_test::serial;

#[test]
fn test_show_config_human_and_json() {
    let config = Config::default();
    assert!(execute(ConfigArgs { all: false }, &config, OutputFormat::Human).is_ok());
    assert!(execute(ConfigArgs { all: true }, &config, OutputFormat::Json).is_ok());
}

#[test]
#[serial]
fn test_config_file_reported_with_all() {
    std::env::set_var("DOCINGEST_CONFIG_FILE", "/tmp/docingest-test/config.toml");
    let response = ConfigResponse::new(&Config::default(), true);
    std::env::remove_var("DOCINGEST_CONFIG_FILE");

    assert_eq!(
        response.config_file.as_deref(),
        Some("/tmp/docingest-test/config.toml")
    );
}

#[test]
#[serial]
fn test_api_key_presence_not_value() {
    std::env::set_var("OPENAI_API_KEY", "sk-secret");
    let response = ConfigResponse::new(&Config::default(), false);
    std::env::remove_var("OPENAI_API_KEY");

    assert!(response.api_key_set);
    let json = serde_json::to_string(&response).unwrap();
    assert!(!json.contains("sk-secret"));
}
