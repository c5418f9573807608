//! 설정 관리 -- hush.toml 파싱 및 런타임 설정
//!
//! [`HushConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HUSH_SUPPRESSOR_REAP_INTERVAL_SECS=10` 형식)
//! 3. 설정 파일 (`hush.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), hush_core::error::HushError> {
//! use hush_core::config::HushConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HushConfig::load("hush.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HushConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, HushError};

/// hush 통합 설정
///
/// `hush.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HushConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 억제 저장소 설정
    #[serde(default)]
    pub suppressor: SuppressorConfig,
    /// 알림 수집 설정
    #[serde(default)]
    pub ingest: IngestConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl HushConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HushError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HushError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HushError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HushError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HushError> {
        toml::from_str(toml_str).map_err(|e| {
            HushError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HUSH_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HUSH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HUSH_GENERAL_LOG_FORMAT");

        // Suppressor
        override_u64(
            &mut self.suppressor.reap_interval_secs,
            "HUSH_SUPPRESSOR_REAP_INTERVAL_SECS",
        );
        override_string(
            &mut self.suppressor.silences_file,
            "HUSH_SUPPRESSOR_SILENCES_FILE",
        );

        // Ingest
        override_bool(&mut self.ingest.stdin, "HUSH_INGEST_STDIN");
        override_usize(
            &mut self.ingest.channel_capacity,
            "HUSH_INGEST_CHANNEL_CAPACITY",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "HUSH_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "HUSH_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "HUSH_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HushError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.suppressor.reap_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "suppressor.reap_interval_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.ingest.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest.channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.metrics.enabled {
            if self.metrics.endpoint != "/metrics" {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.endpoint".to_owned(),
                    reason: "only '/metrics' is supported".to_owned(),
                }
                .into());
            }
            if self.metrics.port == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "metrics.port".to_owned(),
                    reason: "port must not be 0 when metrics are enabled".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 억제 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressorConfig {
    /// 만료 회수 주기 (초)
    pub reap_interval_secs: u64,
    /// 시작 시 불러올 silence 목록 (JSON 배열) 경로, 빈 문자열이면 사용 안 함
    pub silences_file: String,
}

impl Default for SuppressorConfig {
    fn default() -> Self {
        Self {
            reap_interval_secs: 30,
            silences_file: String::new(),
        }
    }
}

/// 알림 수집 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 표준 입력에서 줄 단위 JSON 알림을 읽을지 여부
    pub stdin: bool,
    /// 수집 -> 억제 판정 채널 용량
    pub channel_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            stdin: false,
            channel_capacity: 256,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수신 주소
    pub listen_addr: String,
    /// 수신 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
