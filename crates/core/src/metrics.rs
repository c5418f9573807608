//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `hush_`
//! - 모듈명: `suppressor_`, `ingest_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (gauge/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! metrics::counter!(hush_core::metrics::SUPPRESSOR_CREATED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (info, low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// 결과 레이블 키 (inhibited, forwarded)
pub const LABEL_RESULT: &str = "result";

// ─── Suppressor 메트릭 ─────────────────────────────────────────────

/// Suppressor: 현재 보관 중인 억제 규칙 수 (gauge)
pub const SUPPRESSOR_ACTIVE: &str = "hush_suppressor_active";

/// Suppressor: 생성된 억제 규칙 수 (counter)
pub const SUPPRESSOR_CREATED_TOTAL: &str = "hush_suppressor_created_total";

/// Suppressor: 갱신된 억제 규칙 수 (counter)
pub const SUPPRESSOR_UPDATED_TOTAL: &str = "hush_suppressor_updated_total";

/// Suppressor: 명시적으로 삭제된 억제 규칙 수 (counter)
pub const SUPPRESSOR_DELETED_TOTAL: &str = "hush_suppressor_deleted_total";

/// Suppressor: 만료되어 회수된 억제 규칙 수 (counter)
pub const SUPPRESSOR_REAPED_TOTAL: &str = "hush_suppressor_reaped_total";

/// Suppressor: 억제 판정을 받은 이벤트 수 (counter)
pub const SUPPRESSOR_EVENTS_CHECKED_TOTAL: &str = "hush_suppressor_events_checked_total";

/// Suppressor: 억제된 이벤트 수 (counter)
pub const SUPPRESSOR_EVENTS_INHIBITED_TOTAL: &str = "hush_suppressor_events_inhibited_total";

// ─── Ingest 메트릭 ─────────────────────────────────────────────────

/// Ingest: 수신된 알림 이벤트 수 (counter, label: result)
pub const INGEST_EVENTS_TOTAL: &str = "hush_ingest_events_total";

/// Ingest: 디코딩 실패한 입력 줄 수 (counter)
pub const INGEST_DECODE_ERRORS_TOTAL: &str = "hush_ingest_decode_errors_total";

// ─── Daemon 메트릭 ──────────────────────────────────────────────────

/// Daemon: 가동 시간 (gauge, 초)
pub const DAEMON_UPTIME_SECONDS: &str = "hush_daemon_uptime_seconds";

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "hush_daemon_build_info";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `hush-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    // Suppressor
    describe_gauge!(
        SUPPRESSOR_ACTIVE,
        "Number of suppressions currently held by the store (including expired, not yet reaped)"
    );
    describe_counter!(
        SUPPRESSOR_CREATED_TOTAL,
        "Total number of suppressions created"
    );
    describe_counter!(
        SUPPRESSOR_UPDATED_TOTAL,
        "Total number of suppressions replaced through update"
    );
    describe_counter!(
        SUPPRESSOR_DELETED_TOTAL,
        "Total number of suppressions deleted explicitly"
    );
    describe_counter!(
        SUPPRESSOR_REAPED_TOTAL,
        "Total number of expired suppressions reclaimed by the reaper"
    );
    describe_counter!(
        SUPPRESSOR_EVENTS_CHECKED_TOTAL,
        "Total number of alert events tested against the suppression store"
    );
    describe_counter!(
        SUPPRESSOR_EVENTS_INHIBITED_TOTAL,
        "Total number of alert events inhibited by a suppression"
    );

    // Ingest
    describe_counter!(
        INGEST_EVENTS_TOTAL,
        "Alert events received on the ingest stream, by result"
    );
    describe_counter!(
        INGEST_DECODE_ERRORS_TOTAL,
        "Ingest lines that could not be decoded as alert events"
    );

    // Daemon
    describe_gauge!(DAEMON_UPTIME_SECONDS, "hush daemon uptime in seconds");
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}
