//! 이벤트 시스템 -- 모듈 간 통신의 기본 단위
//!
//! 수집된 알림은 [`AlertEvent`]로 표현되어 억제 판정 단계를 거칩니다.
//! [`EventMetadata`]는 수집 시각과 추적 ID를 담습니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::types::{Labels, Severity};

// --- 모듈명 상수 ---

/// 알림 수집 모듈명
pub const MODULE_INGEST: &str = "ingest";

/// 이벤트 메타데이터 -- 모든 이벤트에 공통으로 포함되는 추적 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// 이벤트 발생 시각
    pub timestamp: SystemTime,
    /// 이벤트를 생성한 모듈명 (예: "ingest")
    pub source_module: String,
    /// 분산 추적 ID -- 같은 흐름의 이벤트를 연결합니다
    pub trace_id: String,
}

impl EventMetadata {
    /// 새로운 UUID v4 trace_id를 생성하여 메타데이터를 만듭니다.
    pub fn with_new_trace(source_module: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::with_new_trace(MODULE_INGEST)
    }
}

/// 알림 이벤트
///
/// 레이블 집합으로 식별되며, 억제 규칙의 필터는 이 레이블만 읽습니다.
/// 억제 판정 과정에서 이벤트는 변경되지 않습니다.
///
/// JSON 입력에서 `id`와 `metadata`는 생략할 수 있습니다.
/// ```json
/// {"labels": {"alertname": "DiskFull", "severity": "critical"}, "summary": "disk 95%"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// 이벤트 고유 ID
    #[serde(default = "new_event_id")]
    pub id: String,
    /// 이벤트 메타데이터
    #[serde(default)]
    pub metadata: EventMetadata,
    /// 알림 레이블
    #[serde(default)]
    pub labels: Labels,
    /// 알림 요약
    #[serde(default)]
    pub summary: String,
    /// 알림 심각도
    #[serde(default)]
    pub severity: Severity,
}

impl AlertEvent {
    /// 새로운 trace를 시작하는 알림 이벤트를 생성합니다.
    pub fn new(labels: Labels, summary: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: new_event_id(),
            metadata: EventMetadata::with_new_trace(MODULE_INGEST),
            labels,
            summary: summary.into(),
            severity,
        }
    }

    /// 레이블 값을 조회합니다.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AlertEvent[{}] severity={} labels={} summary={}",
            short_id(&self.id),
            self.severity,
            self.labels.len(),
            self.summary,
        )
    }
}

fn new_event_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// 앞 8글자 (문자 경계 기준, 외부 입력 ID는 ASCII가 아닐 수 있음)
fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(end, _)| &id[..end])
}
