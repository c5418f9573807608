//! 억제 저장소 에러 타입
//!
//! [`SuppressorError`]는 억제 저장소와 관리 API 어댑터에서 발생하는 모든 에러를 표현합니다.
//! `From<SuppressorError> for HushError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use hush_core::error::{HushError, SuppressionError};

use crate::suppression::SuppressionId;

/// 억제 저장소 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SuppressorError {
    /// 존재하지 않는 ID에 대한 조회/갱신/삭제
    #[error("suppression with id {id} doesn't exist")]
    NotFound {
        /// 찾지 못한 ID
        id: SuppressionId,
    },

    /// 필터 패턴 컴파일 실패
    #[error("invalid filter pattern '{pattern}': {reason}")]
    InvalidFilter {
        /// 원본 패턴
        pattern: String,
        /// 실패 사유
        reason: String,
    },

    /// 표현할 수 없는 타임스탬프
    #[error("invalid timestamp for '{field}': {value}")]
    InvalidTimestamp {
        /// 필드명 (created_at, ends_at)
        field: String,
        /// 입력 값 (Unix 초)
        value: i64,
    },

    /// 요청/응답 직렬화 에러
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SuppressorError {
    /// 클라이언트에 돌려줄 HTTP 상태 코드
    ///
    /// 존재하지 않는 ID는 404, 잘못된 요청은 400, 직렬화 실패는 500입니다.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidFilter { .. } | Self::InvalidTimestamp { .. } => 400,
            Self::Serialization(_) => 500,
        }
    }

    /// NotFound 여부
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<SuppressorError> for HushError {
    fn from(err: SuppressorError) -> Self {
        match err {
            SuppressorError::NotFound { id } => {
                HushError::Suppression(SuppressionError::NotFound(id.get()))
            }
            other => HushError::Suppression(SuppressionError::Rejected(other.to_string())),
        }
    }
}
