//! 만료 회수기
//!
//! [`Reaper`]는 주기적으로 [`Suppressor::reap`]를 호출하는 백그라운드 태스크입니다.
//! 저장소 자체는 시간을 보지 않으므로 만료된 규칙의 제거는 전적으로 이 태스크의 몫입니다.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use hush_core::config::SuppressorConfig;
use hush_core::error::{HushError, PipelineError};
use hush_core::pipeline::{HealthStatus, Pipeline};

use crate::store::Suppressor;

/// 회수기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaperState {
    Initialized,
    Running,
    Stopped,
}

/// 주기적 만료 회수 태스크
pub struct Reaper {
    store: Arc<Suppressor>,
    interval: Duration,
    state: ReaperState,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Reaper {
    /// 회수 주기를 지정해 회수기를 만듭니다.
    pub fn new(store: Arc<Suppressor>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            state: ReaperState::Initialized,
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// 설정의 `reap_interval_secs`로 회수기를 만듭니다.
    pub fn from_config(store: Arc<Suppressor>, config: &SuppressorConfig) -> Self {
        Self::new(store, Duration::from_secs(config.reap_interval_secs))
    }

    /// 회수 주기
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 실행 중 여부
    pub fn is_running(&self) -> bool {
        self.state == ReaperState::Running
    }
}

impl Pipeline for Reaper {
    async fn start(&mut self) -> Result<(), HushError> {
        if self.state == ReaperState::Running {
            return Err(PipelineError::AlreadyRunning.into());
        }
        if self.interval.is_zero() {
            return Err(PipelineError::InitFailed("reap interval must be non-zero".to_owned()).into());
        }

        // stop 이후 재시작할 수 있도록 토큰을 새로 만듦
        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();
        let store = Arc::clone(&self.store);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 첫 tick은 즉시 완료되므로 한 주기 뒤부터 회수
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("reaper task cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let reaped = store.reap(SystemTime::now());
                        debug!(reaped, remaining = store.len(), "reap tick");
                    }
                }
            }
        });

        self.task = Some(task);
        self.state = ReaperState::Running;
        info!(interval_secs = period.as_secs(), "suppression reaper started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HushError> {
        if self.state != ReaperState::Running {
            return Err(PipelineError::NotRunning.into());
        }

        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }

        self.state = ReaperState::Stopped;
        info!("suppression reaper stopped");
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            ReaperState::Running => match &self.task {
                Some(task) if task.is_finished() => {
                    HealthStatus::Unhealthy("reaper task exited".to_owned())
                }
                _ => HealthStatus::Healthy,
            },
            ReaperState::Initialized => HealthStatus::Unhealthy("not started".to_owned()),
            ReaperState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
