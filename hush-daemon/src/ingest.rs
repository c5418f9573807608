//! Alert ingestion from newline-delimited JSON.
//!
//! Each non-empty line is decoded as an [`AlertEvent`] and pushed into the
//! inhibition channel. Malformed lines are logged and skipped.

use hush_core::event::AlertEvent;
use hush_core::metrics as m;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Outcome of decoding a single input line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Blank line, ignored.
    Skipped,
    /// Successfully decoded alert.
    Alert(Box<AlertEvent>),
    /// Decode failure with the parser message.
    Malformed(String),
}

/// Decode one JSON line into an alert.
pub fn decode_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Skipped;
    }
    match serde_json::from_str::<AlertEvent>(trimmed) {
        Ok(event) => LineOutcome::Alert(Box::new(event)),
        Err(e) => LineOutcome::Malformed(e.to_string()),
    }
}

/// Spawn a task that reads alerts from `reader` until EOF or shutdown.
///
/// The task exits when the input ends, the receiving side is closed,
/// or the shutdown signal fires.
pub fn spawn_line_reader<R>(
    reader: R,
    event_tx: mpsc::Sender<AlertEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut line_no: u64 = 0;

        loop {
            tokio::select! {
                next = lines.next_line() => {
                    let line = match next {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            tracing::info!(lines = line_no, "alert input closed");
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to read alert input");
                            break;
                        }
                    };
                    line_no += 1;

                    match decode_line(&line) {
                        LineOutcome::Skipped => {}
                        LineOutcome::Alert(event) => {
                            if event_tx.send(*event).await.is_err() {
                                tracing::debug!("inhibition channel closed, exiting reader");
                                break;
                            }
                        }
                        LineOutcome::Malformed(reason) => {
                            metrics::counter!(m::INGEST_DECODE_ERRORS_TOTAL).increment(1);
                            tracing::warn!(line = line_no, error = %reason, "skipping malformed alert line");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("alert reader shutting down");
                    break;
                }
            }
        }
    })
}
