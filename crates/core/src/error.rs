//! 에러 타입 -- 도메인별 에러 정의

/// hush 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HushError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인(백그라운드 태스크) 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 억제 규칙 에러
    #[error("suppression error: {0}")]
    Suppression(#[from] SuppressionError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 이미 실행 중
    #[error("pipeline already running")]
    AlreadyRunning,

    /// 실행 중이 아님
    #[error("pipeline not running")]
    NotRunning,

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),
}

/// 억제 규칙 에러
///
/// 억제 저장소 바깥(데몬, 프론트엔드)에서 다루는 형태입니다.
#[derive(Debug, thiserror::Error)]
pub enum SuppressionError {
    /// 존재하지 않는 억제 규칙 ID
    #[error("suppression with id {0} doesn't exist")]
    NotFound(u64),

    /// 요청이 거부됨 (잘못된 필터 패턴, 타임스탬프 등)
    #[error("suppression rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_contains_id() {
        let err = SuppressionError::NotFound(42);
        assert_eq!(err.to_string(), "suppression with id 42 doesn't exist");
    }

    #[test]
    fn config_error_converts_to_hush_error() {
        let err: HushError = ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        }
        .into();
        assert!(matches!(err, HushError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn pipeline_error_display() {
        let err: HushError = PipelineError::AlreadyRunning.into();
        assert_eq!(err.to_string(), "pipeline error: pipeline already running");
    }
}
