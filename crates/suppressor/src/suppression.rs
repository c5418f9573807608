//! 억제 규칙 레코드
//!
//! [`Suppression`]은 하나의 억제 구간(생성자, 코멘트, 필터 집합, 종료 시각)을 나타냅니다.
//! 저장소에 들어간 뒤에는 전체 교체(update)로만 바뀝니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use hush_core::event::AlertEvent;

use crate::filter::FilterSet;

/// 억제 규칙 ID
///
/// 저장소가 단조 증가 카운터로 발급합니다. 삭제된 ID는 재사용되지 않습니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SuppressionId(u64);

impl SuppressionId {
    /// 아직 저장소에 추가되지 않은 레코드의 ID
    pub const UNASSIGNED: Self = Self(0);

    /// 원시 값으로 ID를 만듭니다.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// 원시 값
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SuppressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SuppressionId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// 억제 규칙
///
/// `ends_at`이 현재 시각보다 뒤에 있는 동안 활성 상태입니다.
/// 저장소는 `created_at`과 `ends_at`의 선후 관계를 검증하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    /// 저장소가 발급한 ID
    pub id: SuppressionId,
    /// 생성자
    pub created_by: String,
    /// 생성 시각
    pub created_at: SystemTime,
    /// 억제 종료 시각
    pub ends_at: SystemTime,
    /// 코멘트
    pub comment: String,
    /// 적용 대상 필터 (AND 결합)
    pub filters: FilterSet,
}

impl Suppression {
    /// ID가 발급되지 않은 새 레코드를 만듭니다.
    pub fn new(
        created_by: impl Into<String>,
        created_at: SystemTime,
        ends_at: SystemTime,
        comment: impl Into<String>,
        filters: FilterSet,
    ) -> Self {
        Self {
            id: SuppressionId::UNASSIGNED,
            created_by: created_by.into(),
            created_at,
            ends_at,
            comment: comment.into(),
            filters,
        }
    }

    /// 같은 내용에 ID만 지정한 레코드를 반환합니다 (update 요청 작성용).
    pub fn with_id(mut self, id: SuppressionId) -> Self {
        self.id = id;
        self
    }

    /// `now` 시점에 만료되었는지 여부
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.ends_at <= now
    }

    /// `now` 시점에 활성 상태인지 여부
    pub fn is_active_at(&self, now: SystemTime) -> bool {
        !self.is_expired_at(now)
    }

    /// 필터 집합이 이벤트에 매칭되는지 여부
    pub fn handles(&self, event: &AlertEvent) -> bool {
        self.filters.matches_all(event)
    }
}

impl fmt::Display for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Suppression[{}] by={} filters={} comment={}",
            self.id,
            self.created_by,
            self.filters.len(),
            self.comment,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use hush_core::types::{Severity, labels_from};

    fn sample(ends_at: SystemTime) -> Suppression {
        Suppression::new(
            "oncall",
            SystemTime::UNIX_EPOCH,
            ends_at,
            "maintenance window",
            FilterSet::from_patterns([("severity", "critical")]).unwrap(),
        )
    }

    #[test]
    fn new_is_unassigned() {
        let sup = sample(SystemTime::now());
        assert_eq!(sup.id, SuppressionId::UNASSIGNED);
        assert_eq!(sup.with_id(SuppressionId::new(9)).id.get(), 9);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let sup = sample(t);
        assert!(sup.is_expired_at(t));
        assert!(sup.is_active_at(t - Duration::from_secs(1)));
        assert!(sup.is_expired_at(t + Duration::from_secs(1)));
    }

    #[test]
    fn handles_delegates_to_filters() {
        let sup = sample(SystemTime::now());
        let critical = AlertEvent::new(
            labels_from([("severity", "critical")]),
            "",
            Severity::Critical,
        );
        let warning = AlertEvent::new(labels_from([("severity", "warning")]), "", Severity::Low);
        assert!(sup.handles(&critical));
        assert!(!sup.handles(&warning));
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&SuppressionId::new(12)).unwrap();
        assert_eq!(json, "12");
    }

    #[test]
    fn display_contains_id_and_creator() {
        let sup = sample(SystemTime::now()).with_id(SuppressionId::new(4));
        let display = sup.to_string();
        assert!(display.contains("Suppression[4]"));
        assert!(display.contains("oncall"));
    }
}
