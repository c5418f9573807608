//! 파이프라인 trait -- 백그라운드 모듈의 생명주기 정의
//!
//! 데몬은 이 trait을 통해 모든 백그라운드 모듈(만료 회수기 등)을
//! 동일한 방식으로 시작, 정지, 상태 확인합니다.

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::error::HushError;

/// 모듈 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    /// 정상 동작 중
    Healthy,
    /// 동작하지만 성능 저하 등 문제가 있음
    Degraded(String),
    /// 동작하지 않음
    Unhealthy(String),
}

impl HealthStatus {
    /// 정상 상태 여부
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 비정상 상태 여부
    pub fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}

/// 백그라운드 모듈 생명주기 trait
///
/// `start`를 두 번 호출하면 `PipelineError::AlreadyRunning`,
/// 실행 중이 아닐 때 `stop`을 호출하면 `PipelineError::NotRunning`을 반환해야 합니다.
pub trait Pipeline: Send {
    /// 모듈을 시작합니다.
    fn start(&mut self) -> impl Future<Output = Result<(), HushError>> + Send;

    /// 모듈을 정지합니다.
    fn stop(&mut self) -> impl Future<Output = Result<(), HushError>> + Send;

    /// 현재 상태를 반환합니다.
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;
}
