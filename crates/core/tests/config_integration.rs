//! hush.toml 통합 설정 테스트
//!
//! - hush.toml.example 파싱 테스트
//! - 파일 로딩 + 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use std::io::Write;

use hush_core::config::HushConfig;
use hush_core::error::{ConfigError, HushError};
use serial_test::serial;

// =============================================================================
// hush.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../hush.toml.example");
    let config = HushConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../hush.toml.example");
    let config = HushConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../hush.toml.example");
    let config = HushConfig::parse(content).expect("should parse");
    let defaults = HushConfig::default();

    assert_eq!(
        config.suppressor.reap_interval_secs,
        defaults.suppressor.reap_interval_secs
    );
    assert_eq!(config.suppressor.silences_file, defaults.suppressor.silences_file);
    assert_eq!(config.ingest.stdin, defaults.ingest.stdin);
    assert_eq!(config.ingest.channel_capacity, defaults.ingest.channel_capacity);
    assert_eq!(config.metrics.enabled, defaults.metrics.enabled);
    assert_eq!(config.metrics.port, defaults.metrics.port);
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[tokio::test]
#[serial]
async fn load_applies_env_over_file() {
    let file = write_config("[suppressor]\nreap_interval_secs = 15\n");

    // SAFETY: serial 테스트이므로 다른 테스트와 환경변수를 공유하지 않습니다.
    unsafe { std::env::set_var("HUSH_SUPPRESSOR_REAP_INTERVAL_SECS", "3") };
    let config = HushConfig::load(file.path()).await.expect("load");
    unsafe { std::env::remove_var("HUSH_SUPPRESSOR_REAP_INTERVAL_SECS") };

    assert_eq!(config.suppressor.reap_interval_secs, 3);
}

#[tokio::test]
#[serial]
async fn from_file_ignores_env() {
    let file = write_config("[suppressor]\nreap_interval_secs = 15\n");

    // SAFETY: serial 테스트이므로 다른 테스트와 환경변수를 공유하지 않습니다.
    unsafe { std::env::set_var("HUSH_SUPPRESSOR_REAP_INTERVAL_SECS", "3") };
    let config = HushConfig::from_file(file.path()).await.expect("load");
    unsafe { std::env::remove_var("HUSH_SUPPRESSOR_REAP_INTERVAL_SECS") };

    assert_eq!(config.suppressor.reap_interval_secs, 15);
}

#[tokio::test]
async fn load_rejects_invalid_values_from_file() {
    let file = write_config("[general]\nlog_format = \"xml\"\n");
    let err = HushConfig::load(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        HushError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn empty_file_uses_defaults() {
    let file = write_config("");
    let config = HushConfig::from_file(file.path()).await.expect("load");
    assert_eq!(config.general.log_level, "info");
}

#[tokio::test]
async fn malformed_file_reports_parse_failure() {
    let file = write_config("[suppressor\nreap_interval_secs = ");
    let err = HushConfig::from_file(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        HushError::Config(ConfigError::ParseFailed { .. })
    ));
}
