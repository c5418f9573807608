//! Inhibition stage.
//!
//! Consumes ingested alerts and checks each one against the silence store.
//! Silenced alerts are counted and dropped; the rest are logged as forwarded.

use std::sync::Arc;

use hush_core::event::AlertEvent;
use hush_core::metrics as m;
use hush_suppressor::{Inhibitor, SuppressionId};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Result of checking one alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Silenced by the given suppression.
    Inhibited(SuppressionId),
    /// No active suppression matched.
    Forwarded,
}

impl Verdict {
    fn as_label(self) -> &'static str {
        match self {
            Self::Inhibited(_) => "inhibited",
            Self::Forwarded => "forwarded",
        }
    }
}

/// Check a single alert and record the outcome.
pub fn process_alert(inhibitor: &dyn Inhibitor, event: &AlertEvent) -> Verdict {
    let verdict = match inhibitor.is_inhibited(event) {
        Some(sup) => {
            tracing::debug!(
                alert_id = %event.id,
                suppression_id = %sup.id,
                created_by = %sup.created_by,
                "alert inhibited"
            );
            Verdict::Inhibited(sup.id)
        }
        None => {
            tracing::info!(
                alert_id = %event.id,
                severity = %event.severity,
                summary = %event.summary,
                "alert forwarded"
            );
            Verdict::Forwarded
        }
    };

    metrics::counter!(
        m::INGEST_EVENTS_TOTAL,
        m::LABEL_RESULT => verdict.as_label(),
        m::LABEL_SEVERITY => event.severity.to_string()
    )
    .increment(1);
    verdict
}

/// Spawn the inhibition stage.
///
/// On shutdown, alerts already queued in the channel are still checked
/// before the task exits.
pub fn spawn_inhibition_stage(
    inhibitor: Arc<dyn Inhibitor>,
    mut event_rx: mpsc::Receiver<AlertEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                received = event_rx.recv() => {
                    match received {
                        Some(event) => {
                            process_alert(inhibitor.as_ref(), &event);
                        }
                        None => {
                            tracing::debug!("alert channel closed, exiting inhibition stage");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    let mut drained = 0usize;
                    while let Ok(event) = event_rx.try_recv() {
                        process_alert(inhibitor.as_ref(), &event);
                        drained += 1;
                    }
                    tracing::debug!(drained, "inhibition stage shutting down");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    use hush_core::types::{Severity, labels_from};
    use hush_suppressor::{FilterSet, Suppression, Suppressor};

    fn store_with_db_silence() -> (Arc<Suppressor>, SuppressionId) {
        let store = Arc::new(Suppressor::new());
        let id = store.add(Suppression::new(
            "dba",
            SystemTime::now(),
            SystemTime::now() + Duration::from_secs(3_600),
            "failover",
            FilterSet::from_patterns([("team", "db")]).unwrap(),
        ));
        (store, id)
    }

    fn alert(team: &str) -> AlertEvent {
        AlertEvent::new(labels_from([("team", team)]), "test", Severity::Medium)
    }

    #[test]
    fn matching_alert_is_inhibited() {
        let (store, id) = store_with_db_silence();
        assert_eq!(
            process_alert(store.as_ref(), &alert("db")),
            Verdict::Inhibited(id)
        );
    }

    #[test]
    fn other_alert_is_forwarded() {
        let (store, _) = store_with_db_silence();
        assert_eq!(
            process_alert(store.as_ref(), &alert("web")),
            Verdict::Forwarded
        );
    }

    #[tokio::test]
    async fn stage_exits_when_channel_closes() {
        let (store, _) = store_with_db_silence();
        let (tx, rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = spawn_inhibition_stage(store, rx, shutdown_rx);
        tx.send(alert("db")).await.unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("stage should exit")
            .unwrap();
    }

    #[tokio::test]
    async fn stage_exits_on_shutdown() {
        let (store, _) = store_with_db_silence();
        let (_tx, rx) = mpsc::channel::<AlertEvent>(4);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = spawn_inhibition_stage(store, rx, shutdown_rx);
        let _ = shutdown_tx.send(());

        let result = tokio::time::timeout(Duration::from_millis(500), task).await;
        assert!(result.is_ok(), "stage should shut down within timeout");
    }
}
