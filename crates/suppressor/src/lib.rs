//! hush 억제(silence) 관리 크레이트
//!
//! 시간 제한이 있는 억제 규칙을 보관하고, 들어오는 알림이 규칙에 의해
//! 억제되는지 판정하며, 만료된 규칙을 회수합니다.
//!
//! # 모듈 구성
//!
//! - [`filter`]: 레이블 정규식 필터와 필터 집합 (AND 결합)
//! - [`suppression`]: 억제 규칙 레코드와 ID
//! - [`store`]: 스레드 안전한 억제 저장소 (`ends_at` 순 정렬 보관)
//! - [`reaper`]: 주기적 만료 회수 태스크 (Pipeline trait 구현)
//! - [`api`]: 관리 API 요청/응답 변환과 서비스
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! SilenceService --add/update/delete--> Suppressor <--reap(now)-- Reaper
//!                                           ^
//!                  AlertEvent --is_inhibited-+
//! ```

pub mod api;
pub mod error;
pub mod filter;
pub mod reaper;
pub mod store;
pub mod suppression;

// --- 주요 타입 re-export ---

// 저장소
pub use store::{Inhibitor, Suppressor};

// 레코드
pub use suppression::{Suppression, SuppressionId};

// 필터
pub use filter::{Filter, FilterSet};

// 회수기
pub use reaper::Reaper;

// 관리 API
pub use api::{FilterSpec, SilenceRequest, SilenceService, SilenceView};

// 에러
pub use error::SuppressorError;
