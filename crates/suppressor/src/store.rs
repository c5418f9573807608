//! 억제 저장소
//!
//! [`Suppressor`]는 억제 규칙을 메모리에 보관하고 추가/갱신/조회/삭제,
//! 이벤트 억제 판정, 만료 회수를 제공합니다.
//!
//! # 저장 구조
//!
//! 규칙은 `ends_at` 오름차순으로 정렬된 벡터에 보관됩니다. 정렬된 배열은
//! 그 자체로 유효한 최소 힙이므로 가장 먼저 만료되는 규칙이 항상 맨 앞에 있고,
//! 회수 시 이진 탐색으로 경계를 찾아 앞부분만 잘라냅니다.
//! `ends_at`이 같은 규칙끼리는 삽입 순서를 유지합니다.
//!
//! # 동시성
//!
//! 모든 연산은 하나의 `Mutex`로 직렬화됩니다. 조회 결과는 `Arc<Suppression>`
//! 스냅샷이므로 이후의 갱신/삭제가 이미 반환된 값에 영향을 주지 않습니다.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, info};

use hush_core::event::AlertEvent;
use hush_core::metrics as m;

use crate::error::SuppressorError;
use crate::suppression::{Suppression, SuppressionId};

/// 이벤트 억제 판정 인터페이스
///
/// 데몬의 억제 단계는 이 trait을 통해 저장소를 사용합니다.
pub trait Inhibitor: Send + Sync {
    /// 이벤트를 억제하는 규칙이 있으면 반환합니다.
    fn is_inhibited(&self, event: &AlertEvent) -> Option<Arc<Suppression>>;
}

/// 억제 규칙 저장소
#[derive(Debug)]
pub struct Suppressor {
    entries: Mutex<Vec<Arc<Suppression>>>,
    next_id: AtomicU64,
}

impl Suppressor {
    /// 빈 저장소를 만듭니다. 첫 번째로 발급되는 ID는 1입니다.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<Suppression>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 규칙을 추가하고 새로 발급한 ID를 반환합니다.
    ///
    /// 입력의 `id` 필드는 무시됩니다.
    pub fn add(&self, mut suppression: Suppression) -> SuppressionId {
        let mut entries = self.lock();
        let id = SuppressionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        suppression.id = id;

        let pos = insert_position(&entries, suppression.ends_at);
        entries.insert(pos, Arc::new(suppression));

        metrics::counter!(m::SUPPRESSOR_CREATED_TOTAL).increment(1);
        metrics::gauge!(m::SUPPRESSOR_ACTIVE).set(entries.len() as f64);
        debug!(suppression_id = %id, stored = entries.len(), "suppression added");
        id
    }

    /// `suppression.id`와 같은 ID의 규칙을 통째로 교체합니다.
    ///
    /// 해당 ID가 없으면 `NotFound`를 반환하고 저장소는 변하지 않습니다.
    pub fn update(&self, suppression: Suppression) -> Result<(), SuppressorError> {
        let id = suppression.id;
        let mut entries = self.lock();
        let index = position_of(&entries, id).ok_or(SuppressorError::NotFound { id })?;

        if entries[index].ends_at == suppression.ends_at {
            entries[index] = Arc::new(suppression);
        } else {
            entries.remove(index);
            let pos = insert_position(&entries, suppression.ends_at);
            entries.insert(pos, Arc::new(suppression));
        }

        metrics::counter!(m::SUPPRESSOR_UPDATED_TOTAL).increment(1);
        debug!(suppression_id = %id, "suppression updated");
        Ok(())
    }

    /// ID로 규칙을 조회합니다.
    pub fn get(&self, id: SuppressionId) -> Result<Arc<Suppression>, SuppressorError> {
        let entries = self.lock();
        position_of(&entries, id)
            .map(|index| Arc::clone(&entries[index]))
            .ok_or(SuppressorError::NotFound { id })
    }

    /// ID로 규칙을 삭제합니다.
    pub fn delete(&self, id: SuppressionId) -> Result<(), SuppressorError> {
        let mut entries = self.lock();
        let index = position_of(&entries, id).ok_or(SuppressorError::NotFound { id })?;
        entries.remove(index);

        metrics::counter!(m::SUPPRESSOR_DELETED_TOTAL).increment(1);
        metrics::gauge!(m::SUPPRESSOR_ACTIVE).set(entries.len() as f64);
        debug!(suppression_id = %id, stored = entries.len(), "suppression deleted");
        Ok(())
    }

    /// 보관 중인 모든 규칙의 스냅샷을 저장 순서대로 반환합니다.
    ///
    /// 만료되었지만 아직 회수되지 않은 규칙도 포함됩니다.
    pub fn summary(&self) -> Vec<Arc<Suppression>> {
        self.lock().clone()
    }

    /// 현재 시각 기준으로 이벤트를 억제하는 첫 번째 규칙을 찾습니다.
    pub fn is_inhibited(&self, event: &AlertEvent) -> Option<Arc<Suppression>> {
        self.is_inhibited_at(event, SystemTime::now())
    }

    /// `now` 시점 기준으로 이벤트를 억제하는 첫 번째 규칙을 찾습니다.
    ///
    /// 저장 순서(가장 먼저 만료되는 순)로 평가하며, 이미 만료된 규칙은 건너뜁니다.
    pub fn is_inhibited_at(&self, event: &AlertEvent, now: SystemTime) -> Option<Arc<Suppression>> {
        let entries = self.lock();
        let found = entries
            .iter()
            .filter(|s| s.is_active_at(now))
            .find(|s| s.handles(event))
            .map(Arc::clone);
        drop(entries);

        metrics::counter!(m::SUPPRESSOR_EVENTS_CHECKED_TOTAL).increment(1);
        if let Some(ref sup) = found {
            metrics::counter!(m::SUPPRESSOR_EVENTS_INHIBITED_TOTAL).increment(1);
            debug!(event_id = %event.id, suppression_id = %sup.id, "event inhibited");
        }
        found
    }

    /// `ends_at <= now`인 규칙을 모두 제거하고 제거한 개수를 반환합니다.
    pub fn reap(&self, now: SystemTime) -> usize {
        let mut entries = self.lock();
        let boundary = entries.partition_point(|s| s.is_expired_at(now));
        if boundary == 0 {
            return 0;
        }
        entries.drain(..boundary);

        metrics::counter!(m::SUPPRESSOR_REAPED_TOTAL).increment(boundary as u64);
        metrics::gauge!(m::SUPPRESSOR_ACTIVE).set(entries.len() as f64);
        info!(removed = boundary, remaining = entries.len(), "expired suppressions reaped");
        boundary
    }

    /// 보관 중인 규칙 수 (만료 후 미회수 포함)
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 비어있는지 여부
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// 가장 먼저 만료되는 규칙의 종료 시각
    pub fn next_expiry(&self) -> Option<SystemTime> {
        self.lock().first().map(|s| s.ends_at)
    }
}

impl Default for Suppressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Inhibitor for Suppressor {
    fn is_inhibited(&self, event: &AlertEvent) -> Option<Arc<Suppression>> {
        Suppressor::is_inhibited(self, event)
    }
}

// 같은 ends_at 뒤에 삽입해 삽입 순서를 유지
fn insert_position(entries: &[Arc<Suppression>], ends_at: SystemTime) -> usize {
    entries.partition_point(|s| s.ends_at <= ends_at)
}

fn position_of(entries: &[Arc<Suppression>], id: SuppressionId) -> Option<usize> {
    entries.iter().position(|s| s.id == id)
}
