//! Daemon orchestration -- assembly, channel wiring, and lifecycle management.
//!
//! The [`Orchestrator`] is the central coordinator of `hush-daemon`.
//! It validates configuration, builds the silence store, preloads silences,
//! wires the ingestion channel, and manages startup/shutdown ordering.
//!
//! # Startup Order
//!
//! 1. Reaper (expiry reclamation)
//! 2. Inhibition stage (consumes AlertEvents)
//! 3. Ingest reader (produces AlertEvents, if `ingest.stdin`)
//!
//! # Shutdown Order (producers first)
//!
//! 1. Ingest reader
//! 2. Inhibition stage (drains queued AlertEvents)
//! 3. Reaper

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use hush_core::config::HushConfig;
use hush_core::event::AlertEvent;
use hush_core::pipeline::{HealthStatus, Pipeline};
use hush_suppressor::{Inhibitor, Reaper, SilenceService, Suppressor};

use crate::health::{DaemonHealth, ModuleHealth, aggregate_status, task_status};
use crate::metrics_server;
use crate::{ingest, inhibit};

/// The main daemon orchestrator.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: HushConfig,
    /// Shared silence store.
    store: Arc<Suppressor>,
    /// Management adapter over the store.
    silences: SilenceService,
    /// Expiry reclamation task.
    reaper: Reaper,
    /// Shutdown broadcast sender (signals all background tasks).
    shutdown_tx: broadcast::Sender<()>,
    /// Producer side of the inhibition channel, until `run` takes it.
    event_tx: Option<mpsc::Sender<AlertEvent>>,
    /// Consumer side of the inhibition channel, until `run` takes it.
    event_rx: Option<mpsc::Receiver<AlertEvent>>,
    /// Inhibition stage task, while running.
    inhibition_task: Option<JoinHandle<()>>,
    /// Ingest reader task, while running with `ingest.stdin`.
    reader_task: Option<JoinHandle<()>>,
    /// Daemon start time (for uptime reporting).
    start_time: Instant,
}

impl Orchestrator {
    /// Load configuration and build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or parsed
    /// - Configuration validation fails
    /// - The silences preload file is unreadable or invalid
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = HushConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config).await
    }

    /// Build from an already-loaded configuration.
    pub async fn build_from_config(config: HushConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
            tracing::info!(port = config.metrics.port, "metrics endpoint enabled");
        }

        let store = Arc::new(Suppressor::new());
        let silences = SilenceService::new(Arc::clone(&store));

        if !config.suppressor.silences_file.is_empty() {
            let path = Path::new(&config.suppressor.silences_file);
            let loaded = preload_silences(&silences, path).await?;
            tracing::info!(path = %path.display(), loaded, "silences preloaded from file");
        }

        let reaper = Reaper::from_config(Arc::clone(&store), &config.suppressor);

        tracing::debug!(
            capacity = config.ingest.channel_capacity,
            "creating inhibition channel"
        );
        let (event_tx, event_rx) = mpsc::channel(config.ingest.channel_capacity);
        let (shutdown_tx, _) = broadcast::channel(16);

        if config.metrics.enabled {
            record_daemon_metrics();
        }

        tracing::info!(
            silences = store.len(),
            reap_interval_secs = config.suppressor.reap_interval_secs,
            stdin = config.ingest.stdin,
            "orchestrator initialized"
        );

        Ok(Self {
            config,
            store,
            silences,
            reaper,
            shutdown_tx,
            event_tx: Some(event_tx),
            event_rx: Some(event_rx),
            inhibition_task: None,
            reader_task: None,
            start_time: Instant::now(),
        })
    }

    /// Start all components and block until SIGTERM or SIGINT.
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(async {
            match wait_for_shutdown_signal().await {
                Ok(signal) => tracing::info!(signal, "shutdown signal received"),
                Err(e) => tracing::error!(error = %e, "signal handling failed, shutting down"),
            }
        })
        .await
    }

    /// Start all components and run until `shutdown` completes.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let event_rx = self
            .event_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("orchestrator already ran"))?;
        let event_tx = self
            .event_tx
            .take()
            .ok_or_else(|| anyhow::anyhow!("orchestrator already ran"))?;

        self.reaper.start().await?;

        let inhibitor: Arc<dyn Inhibitor> = self.store.clone();
        self.inhibition_task = Some(inhibit::spawn_inhibition_stage(
            inhibitor,
            event_rx,
            self.shutdown_tx.subscribe(),
        ));

        self.reader_task = if self.config.ingest.stdin {
            tracing::info!("reading alerts from stdin");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            Some(ingest::spawn_line_reader(
                stdin,
                event_tx,
                self.shutdown_tx.subscribe(),
            ))
        } else {
            drop(event_tx);
            None
        };

        let uptime_task = if self.config.metrics.enabled {
            Some(spawn_uptime_updater(
                self.start_time,
                self.shutdown_tx.subscribe(),
            ))
        } else {
            None
        };

        tracing::info!("hush-daemon running");
        shutdown.await;

        tracing::info!("broadcasting shutdown signal to all tasks");
        let _ = self.shutdown_tx.send(());

        for task in [
            self.reader_task.take(),
            self.inhibition_task.take(),
            uptime_task,
        ]
            .into_iter()
            .flatten()
        {
            join_quietly(task).await;
        }

        self.reaper.stop().await?;
        tracing::info!(silences = self.store.len(), "hush-daemon stopped");
        Ok(())
    }

    /// Sender into the inhibition channel, for feeding alerts programmatically.
    ///
    /// Returns `None` once `run` has started.
    pub fn event_sender(&self) -> Option<mpsc::Sender<AlertEvent>> {
        self.event_tx.clone()
    }

    /// Get the current aggregated health status.
    pub async fn health(&self) -> DaemonHealth {
        let started = self.event_rx.is_none();
        let modules = vec![
            ModuleHealth {
                name: "reaper".to_owned(),
                enabled: true,
                status: self.reaper.health_check().await,
            },
            ModuleHealth {
                name: "inhibition".to_owned(),
                enabled: true,
                status: task_status(
                    started,
                    self.inhibition_task.as_ref(),
                    HealthStatus::Unhealthy("exited".to_owned()),
                ),
            },
            ModuleHealth {
                name: "ingest".to_owned(),
                enabled: self.config.ingest.stdin,
                status: task_status(
                    started,
                    self.reader_task.as_ref(),
                    HealthStatus::Degraded("input closed".to_owned()),
                ),
            },
        ];

        let uptime_secs = self.start_time.elapsed().as_secs();
        if self.config.metrics.enabled {
            use hush_core::metrics as m;
            #[allow(clippy::cast_precision_loss)]
            metrics::gauge!(m::DAEMON_UPTIME_SECONDS).set(uptime_secs as f64);
        }

        DaemonHealth {
            status: aggregate_status(&modules),
            uptime_secs,
            silences: self.store.len(),
            modules,
        }
    }

    /// Shared silence store.
    pub fn store(&self) -> &Arc<Suppressor> {
        &self.store
    }

    /// Management adapter over the store.
    pub fn silences(&self) -> &SilenceService {
        &self.silences
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &HushConfig {
        &self.config
    }
}

/// Read and load a JSON array of silence requests.
async fn preload_silences(silences: &SilenceService, path: &Path) -> Result<usize> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        anyhow::anyhow!("failed to read silences file {}: {}", path.display(), e)
    })?;
    let ids = silences
        .load_silences_json(&json)
        .map_err(|e| anyhow::anyhow!("invalid silences file {}: {}", path.display(), e))?;
    Ok(ids.len())
}

async fn join_quietly(task: JoinHandle<()>) {
    if let Err(e) = task.await {
        if e.is_panic() {
            tracing::error!(error = %e, "background task panicked");
        }
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Record daemon-level metrics (build info).
fn record_daemon_metrics() {
    use hush_core::metrics as m;

    metrics::gauge!(m::DAEMON_BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "daemon metrics recorded");
}

/// Spawn a background task that periodically updates the uptime metric.
fn spawn_uptime_updater(
    start_time: Instant,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    use hush_core::metrics as m;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(10));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let uptime_secs = start_time.elapsed().as_secs();
                    #[allow(clippy::cast_precision_loss)]
                    metrics::gauge!(m::DAEMON_UPTIME_SECONDS).set(uptime_secs as f64);
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("uptime updater shutting down");
                    break;
                }
            }
        }
    })
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("silences", &self.store.len())
            .field("running", &self.event_rx.is_none())
            .finish_non_exhaustive()
    }
}
