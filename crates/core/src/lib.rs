//! hush 공통 크레이트
//!
//! 모든 hush 크레이트가 공유하는 에러, 설정, 이벤트, 도메인 타입,
//! 생명주기 trait, 메트릭 이름을 정의합니다.
//!
//! # 모듈 구성
//!
//! - [`config`]: `hush.toml` 파싱, 환경변수 오버라이드, 검증
//! - [`error`]: 최상위 에러 타입과 도메인별 에러
//! - [`event`]: 알림 이벤트와 메타데이터
//! - [`pipeline`]: 백그라운드 모듈 생명주기 trait
//! - [`metrics`]: Prometheus 메트릭 이름 상수
//! - [`types`]: 심각도, 레이블 집합

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, HushError, PipelineError, SuppressionError};

// 설정
pub use config::HushConfig;

// 이벤트
pub use event::{AlertEvent, EventMetadata};

// 파이프라인 trait
pub use pipeline::{HealthStatus, Pipeline};

// 도메인 타입
pub use types::{Labels, Severity};
