//! 관리 API 어댑터
//!
//! 클라이언트가 보내는 JSON 요청(타임스탬프는 Unix 초, 필터는 패턴 문자열)을
//! 도메인 타입으로 디코딩하고, 저장소 결과를 응답 형태로 직렬화합니다.
//! 디코딩 실패는 저장소를 건드리기 전에 에러로 반환됩니다.
//!
//! # 요청 예시
//!
//! ```json
//! {
//!   "created_by": "oncall",
//!   "created_at": 1700000000,
//!   "ends_at": 1700003600,
//!   "comment": "db maintenance",
//!   "filters": [{"name_pattern": "team", "value_pattern": "db"}]
//! }
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SuppressorError;
use crate::filter::{Filter, FilterSet};
use crate::store::Suppressor;
use crate::suppression::{Suppression, SuppressionId};

/// 필터 직렬화 형태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// 레이블명 정규식
    pub name_pattern: String,
    /// 레이블 값 정규식
    pub value_pattern: String,
}

impl From<&Filter> for FilterSpec {
    fn from(filter: &Filter) -> Self {
        Self {
            name_pattern: filter.name_pattern().to_owned(),
            value_pattern: filter.value_pattern().to_owned(),
        }
    }
}

/// 억제 규칙 생성/갱신 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilenceRequest {
    /// 생성자
    pub created_by: String,
    /// 생성 시각 (Unix 초)
    pub created_at: i64,
    /// 종료 시각 (Unix 초)
    pub ends_at: i64,
    /// 코멘트
    #[serde(default)]
    pub comment: String,
    /// 필터 목록
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl SilenceRequest {
    /// 요청을 ID 미발급 레코드로 디코딩합니다.
    pub fn into_suppression(self) -> Result<Suppression, SuppressorError> {
        let created_at = from_unix_secs("created_at", self.created_at)?;
        let ends_at = from_unix_secs("ends_at", self.ends_at)?;
        let filters = FilterSet::from_patterns(
            self.filters
                .into_iter()
                .map(|f| (f.name_pattern, f.value_pattern)),
        )?;
        Ok(Suppression::new(
            self.created_by,
            created_at,
            ends_at,
            self.comment,
            filters,
        ))
    }
}

/// 억제 규칙 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilenceView {
    /// 규칙 ID
    pub id: SuppressionId,
    /// 생성자
    pub created_by: String,
    /// 생성 시각 (Unix 초)
    pub created_at: i64,
    /// 종료 시각 (Unix 초)
    pub ends_at: i64,
    /// 코멘트
    pub comment: String,
    /// 필터 목록
    pub filters: Vec<FilterSpec>,
}

impl From<&Suppression> for SilenceView {
    fn from(sup: &Suppression) -> Self {
        Self {
            id: sup.id,
            created_by: sup.created_by.clone(),
            created_at: to_unix_secs(sup.created_at),
            ends_at: to_unix_secs(sup.ends_at),
            comment: sup.comment.clone(),
            filters: sup.filters.iter().map(FilterSpec::from).collect(),
        }
    }
}

/// 관리 API 서비스
///
/// HTTP 등 외부 프론트엔드가 호출하는 진입점입니다.
#[derive(Debug, Clone)]
pub struct SilenceService {
    store: Arc<Suppressor>,
}

impl SilenceService {
    /// 저장소를 감싸는 서비스를 만듭니다.
    pub fn new(store: Arc<Suppressor>) -> Self {
        Self { store }
    }

    /// 내부 저장소
    pub fn store(&self) -> &Arc<Suppressor> {
        &self.store
    }

    /// 요청을 디코딩해 규칙을 추가합니다.
    pub fn add_silence(&self, request: SilenceRequest) -> Result<SuppressionId, SuppressorError> {
        let suppression = request.into_suppression()?;
        Ok(self.store.add(suppression))
    }

    /// 요청 내용으로 `id` 규칙을 교체합니다.
    pub fn update_silence(
        &self,
        id: SuppressionId,
        request: SilenceRequest,
    ) -> Result<(), SuppressorError> {
        let suppression = request.into_suppression()?.with_id(id);
        self.store.update(suppression)
    }

    /// ID로 규칙을 조회합니다.
    pub fn get_silence(&self, id: SuppressionId) -> Result<SilenceView, SuppressorError> {
        self.store.get(id).map(|sup| SilenceView::from(sup.as_ref()))
    }

    /// ID로 규칙을 삭제합니다.
    pub fn delete_silence(&self, id: SuppressionId) -> Result<(), SuppressorError> {
        self.store.delete(id)
    }

    /// 모든 규칙을 ID 오름차순으로 반환합니다.
    pub fn silence_summary(&self) -> Vec<SilenceView> {
        let mut views: Vec<SilenceView> = self
            .store
            .summary()
            .iter()
            .map(|sup| SilenceView::from(sup.as_ref()))
            .collect();
        views.sort_by_key(|v| v.id);
        views
    }

    /// 요약을 JSON 배열 문자열로 직렬화합니다.
    pub fn summary_json(&self) -> Result<String, SuppressorError> {
        Ok(serde_json::to_string(&self.silence_summary())?)
    }

    /// JSON 배열의 요청들을 한꺼번에 추가합니다.
    ///
    /// 모든 요청을 먼저 디코딩하므로, 하나라도 잘못되면 아무것도 추가되지 않습니다.
    pub fn load_silences_json(&self, json: &str) -> Result<Vec<SuppressionId>, SuppressorError> {
        let requests: Vec<SilenceRequest> = serde_json::from_str(json)?;
        let suppressions = requests
            .into_iter()
            .map(SilenceRequest::into_suppression)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| warn!(error = %e, "rejected silence preload"))?;

        let ids: Vec<_> = suppressions
            .into_iter()
            .map(|sup| self.store.add(sup))
            .collect();
        info!(count = ids.len(), "silences preloaded");
        Ok(ids)
    }
}

/// Unix 초를 `SystemTime`으로 변환합니다.
///
/// 음수(에포크 이전) 값은 `SystemTime`으로 표현할 수 있지만 의도적으로
/// 받아들이지 않고 `InvalidTimestamp`로 거부합니다.
fn from_unix_secs(field: &str, value: i64) -> Result<SystemTime, SuppressorError> {
    let invalid = || SuppressorError::InvalidTimestamp {
        field: field.to_owned(),
        value,
    };
    let secs = u64::try_from(value).map_err(|_| invalid())?;
    UNIX_EPOCH
        .checked_add(Duration::from_secs(secs))
        .ok_or_else(invalid)
}

fn to_unix_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs())
            .map(|secs| -secs)
            .unwrap_or(i64::MIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_core::types::{Severity, labels_from};
    use hush_core::event::AlertEvent;

    fn request(ends_at: i64, filters: &[(&str, &str)]) -> SilenceRequest {
        SilenceRequest {
            created_by: "oncall".to_owned(),
            created_at: 1_700_000_000,
            ends_at,
            comment: "maintenance".to_owned(),
            filters: filters
                .iter()
                .map(|(n, v)| FilterSpec {
                    name_pattern: (*n).to_owned(),
                    value_pattern: (*v).to_owned(),
                })
                .collect(),
        }
    }

    fn service() -> SilenceService {
        SilenceService::new(Arc::new(Suppressor::new()))
    }

    #[test]
    fn request_decodes_timestamps_and_filters() {
        let sup = request(1_700_003_600, &[("team", "db")])
            .into_suppression()
            .unwrap();
        assert_eq!(
            sup.ends_at,
            UNIX_EPOCH + Duration::from_secs(1_700_003_600)
        );
        assert_eq!(sup.filters.len(), 1);
        assert_eq!(sup.id, SuppressionId::UNASSIGNED);
    }

    #[test]
    fn negative_timestamp_is_rejected() {
        let err = request(-5, &[]).into_suppression().unwrap_err();
        match err {
            SuppressorError::InvalidTimestamp { field, value } => {
                assert_eq!(field, "ends_at");
                assert_eq!(value, -5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_pattern_does_not_touch_store() {
        let svc = service();
        let err = svc.add_silence(request(10, &[("team", "(")])).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(svc.store().is_empty());
    }

    #[test]
    fn view_round_trips_request_fields() {
        let svc = service();
        let id = svc
            .add_silence(request(1_700_003_600, &[("team", "db|cache")]))
            .unwrap();
        let view = svc.get_silence(id).unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.created_by, "oncall");
        assert_eq!(view.created_at, 1_700_000_000);
        assert_eq!(view.ends_at, 1_700_003_600);
        assert_eq!(
            view.filters,
            vec![FilterSpec {
                name_pattern: "team".to_owned(),
                value_pattern: "db|cache".to_owned(),
            }]
        );
    }

    #[test]
    fn update_unknown_id_maps_to_404() {
        let svc = service();
        let err = svc
            .update_silence(SuppressionId::new(5), request(10, &[]))
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn update_keeps_id() {
        let svc = service();
        let id = svc.add_silence(request(100, &[])).unwrap();
        svc.update_silence(id, request(200, &[("team", "db")]))
            .unwrap();
        let view = svc.get_silence(id).unwrap();
        assert_eq!(view.ends_at, 200);
        assert_eq!(view.filters.len(), 1);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let svc = service();
        let id = svc.add_silence(request(100, &[])).unwrap();
        svc.delete_silence(id).unwrap();
        assert!(svc.get_silence(id).unwrap_err().is_not_found());
        assert!(svc.delete_silence(id).unwrap_err().is_not_found());
    }

    #[test]
    fn summary_is_sorted_by_id() {
        let svc = service();
        let a = svc.add_silence(request(300, &[])).unwrap();
        let b = svc.add_silence(request(100, &[])).unwrap();
        let c = svc.add_silence(request(200, &[])).unwrap();
        let ids: Vec<_> = svc.silence_summary().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn summary_json_shape() {
        let svc = service();
        svc.add_silence(request(100, &[("severity", "critical")]))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&svc.summary_json().unwrap()).unwrap();
        let first = &json[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["ends_at"], 100);
        assert_eq!(first["filters"][0]["name_pattern"], "severity");
    }

    #[test]
    fn load_rejects_whole_batch_on_bad_entry() {
        let svc = service();
        let json = r#"[
            {"created_by": "a", "created_at": 0, "ends_at": 100, "filters": []},
            {"created_by": "b", "created_at": 0, "ends_at": -1, "filters": []}
        ]"#;
        assert!(svc.load_silences_json(json).is_err());
        assert!(svc.store().is_empty());
    }

    #[test]
    fn load_adds_all_entries() {
        let svc = service();
        let json = r#"[
            {"created_by": "a", "created_at": 0, "ends_at": 4102444800,
             "filters": [{"name_pattern": "severity", "value_pattern": "critical"}]},
            {"created_by": "b", "created_at": 0, "ends_at": 4102444800}
        ]"#;
        let ids = svc.load_silences_json(json).unwrap();
        assert_eq!(ids.len(), 2);

        let critical = AlertEvent::new(
            labels_from([("severity", "critical")]),
            "",
            Severity::Critical,
        );
        assert!(svc.store().is_inhibited(&critical).is_some());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = service().load_silences_json("{not json").unwrap_err();
        assert!(matches!(err, SuppressorError::Serialization(_)));
    }

    #[test]
    fn time_before_epoch_is_negative() {
        let t = UNIX_EPOCH - Duration::from_secs(30);
        assert_eq!(to_unix_secs(t), -30);
    }
}
