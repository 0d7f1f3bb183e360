//! Bulk import orchestration
//!
//! Drives server-side import jobs through start/stop/poll and chains
//! categories for combined imports. One poll loop runs at a time: it polls
//! right after a job is accepted, then once per poll interval for as long as
//! a job is running. Failed polls are logged and retried on the same
//! interval; only job completion, a confirmed stop or shutdown end the loop.
//!
//! Every user-visible outcome goes to the shared [`ActivityLog`] and is
//! broadcast as an [`ImportEvent`].

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use marquee_catalog_client::{ImportJobStatus, ImportStats, MediaType};
use marquee_shared_config::ImportConfig;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::chain::ImportChain;
use super::events::ImportEvent;
use super::runner::ImportJobRunner;
use crate::activity_log::ActivityLog;
use crate::error::{CoreError, CoreResult};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Timing and sizing of import jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    pub poll_interval: Duration,
    /// Size parameter used when the caller does not pass one
    pub default_size: u32,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            default_size: 50,
        }
    }
}

impl ImportSettings {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            default_size: config.default_size,
        }
    }
}

#[derive(Debug, Default)]
struct OrchestratorState {
    last_status: Option<ImportJobStatus>,
    chain: ImportChain,
    size: u32,
    stop_requested: bool,
    /// A job was accepted and its completion has not been observed yet
    phase_active: bool,
    /// Category of the tracked job; statuses for other categories never
    /// complete it
    current_phase: Option<MediaType>,
    /// The runner reported the tracked job running at least once
    phase_seen_running: bool,
    phase_started_at: Option<Instant>,
    /// A poll loop owns the polling cadence
    polling: bool,
    /// Bumped by start and stop; poll results fetched under an older
    /// generation are discarded
    generation: u64,
}

/// State overwritten by an optimistic stop
struct StopRollback {
    chain: ImportChain,
    stop_requested: bool,
    last_status: Option<ImportJobStatus>,
    phase_active: bool,
    current_phase: Option<MediaType>,
    phase_seen_running: bool,
    phase_started_at: Option<Instant>,
}

impl StopRollback {
    fn restore(self, state: &mut OrchestratorState) {
        state.chain = self.chain;
        state.stop_requested = self.stop_requested;
        state.last_status = self.last_status;
        state.phase_active = self.phase_active;
        state.current_phase = self.current_phase;
        state.phase_seen_running = self.phase_seen_running;
        state.phase_started_at = self.phase_started_at;
    }
}

struct Inner<R> {
    runner: R,
    log: ActivityLog,
    settings: ImportSettings,
    state: Mutex<OrchestratorState>,
    events: broadcast::Sender<ImportEvent>,
    poll_task: StdMutex<Option<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

/// Coordinates one import job (or chain of jobs) at a time
pub struct BulkImportOrchestrator<R: ImportJobRunner> {
    inner: Arc<Inner<R>>,
}

impl<R: ImportJobRunner> Clone for BulkImportOrchestrator<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ImportJobRunner> BulkImportOrchestrator<R> {
    pub fn new(runner: R, log: ActivityLog, settings: ImportSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                runner,
                log,
                settings,
                state: Mutex::new(OrchestratorState::default()),
                events,
                poll_task: StdMutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ImportEvent> {
        self.inner.events.subscribe()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.inner.log
    }

    pub fn runner(&self) -> &R {
        &self.inner.runner
    }

    pub fn settings(&self) -> ImportSettings {
        self.inner.settings
    }

    /// Status from the most recent applied poll
    pub async fn last_status(&self) -> Option<ImportJobStatus> {
        self.inner.state.lock().await.last_status.clone()
    }

    /// Categories still queued behind the current phase
    pub async fn remaining_phases(&self) -> Vec<MediaType> {
        self.inner.state.lock().await.chain.remaining().collect()
    }

    pub async fn is_polling(&self) -> bool {
        self.inner.state.lock().await.polling
    }

    fn emit(&self, event: ImportEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }

    /// Poll once and resume polling if a job is already running. An
    /// interrupted chain is not resumed.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> CoreResult<ImportJobStatus> {
        let status = self.poll().await?;
        if status.running {
            self.inner.log.info(format!(
                "Import of {} already running, resuming status updates",
                status.media_type.plural_label()
            ));
            let spawn = {
                let mut state = self.inner.state.lock().await;
                Self::adopt(&mut state, status.media_type);
                Self::claim(&mut state, &self.inner.shutdown)
            };
            if spawn {
                self.spawn_poll_loop();
            }
        }
        Ok(status)
    }

    /// Start a single-category import
    pub async fn start(&self, media_type: MediaType, size: Option<u32>) -> CoreResult<()> {
        self.start_chain(ImportChain::single(media_type), size).await
    }

    /// Import movies, then series with the same size parameter
    pub async fn start_all(&self, size: Option<u32>) -> CoreResult<()> {
        self.start_chain(ImportChain::all(), size).await
    }

    /// Start the first phase of `chain`. Later phases start as each one
    /// completes.
    #[instrument(skip(self, chain))]
    pub async fn start_chain(&self, mut chain: ImportChain, size: Option<u32>) -> CoreResult<()> {
        let size = size.unwrap_or(self.inner.settings.default_size);

        let media_type = {
            let mut state = self.inner.state.lock().await;

            // Best effort: only as fresh as the last poll
            if let Some(status) = state.last_status.as_ref().filter(|s| s.running) {
                let err = CoreError::JobAlreadyRunning {
                    media_type: status.media_type,
                };
                err.log("start_import");
                self.inner.log.error(err.to_string());
                return Err(err);
            }

            let Some(media_type) = chain.advance() else {
                return Err(CoreError::InvalidInput("import chain has no phases".to_string()));
            };

            state.chain = chain;
            state.size = size;
            state.stop_requested = false;
            state.generation += 1;
            media_type
        };

        self.start_phase(media_type, size).await
    }

    async fn start_phase(&self, media_type: MediaType, size: u32) -> CoreResult<()> {
        let label = media_type.plural_label();
        self.inner
            .log
            .info(format!("Starting import of {} (size {})", label, size));

        if let Err(e) = self.inner.runner.start(media_type, size).await {
            let err = CoreError::from(e);
            err.log("start_import");
            self.inner
                .log
                .error(format!("Failed to start import of {}: {}", label, err));

            let mut state = self.inner.state.lock().await;
            state.chain.abandon();
            state.phase_active = false;
            return Err(err);
        }

        info!(media_type = %media_type, size = size, "Import job accepted");
        let spawn = {
            let mut state = self.inner.state.lock().await;
            state.phase_active = true;
            state.current_phase = Some(media_type);
            state.phase_seen_running = false;
            state.phase_started_at = Some(Instant::now());
            Self::claim(&mut state, &self.inner.shutdown)
        };
        self.emit(ImportEvent::PhaseStarted(media_type));
        if spawn {
            self.spawn_poll_loop();
        }
        Ok(())
    }

    /// Ask the runner to stop. The stop is confirmed by a later poll; the
    /// local running flag flips right away and queued phases are dropped.
    /// If the runner refuses, the previous state comes back.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> CoreResult<()> {
        let (saved, optimistic, generation) = {
            let mut guard = self.inner.state.lock().await;
            let state = &mut *guard;
            let saved = StopRollback {
                chain: state.chain.clone(),
                stop_requested: state.stop_requested,
                last_status: state.last_status.clone(),
                phase_active: state.phase_active,
                current_phase: state.current_phase,
                phase_seen_running: state.phase_seen_running,
                phase_started_at: state.phase_started_at,
            };

            state.stop_requested = true;
            state.generation += 1;
            state.chain.abandon();
            if let Some(status) = state.last_status.as_mut() {
                if status.running {
                    // Let the confirming poll report the completion
                    let media_type = status.media_type;
                    status.running = false;
                    Self::adopt(state, media_type);
                }
            }
            (saved, state.last_status.clone(), state.generation)
        };

        self.inner.log.info("Stopping import");
        if let Err(e) = self.inner.runner.stop().await {
            let err = CoreError::from(e);
            err.log("stop_import");
            self.inner
                .log
                .error(format!("Failed to stop import: {}", err));

            let mut state = self.inner.state.lock().await;
            // Only roll back if nothing was started or applied meanwhile
            if state.generation == generation && state.last_status == optimistic {
                saved.restore(&mut state);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Fetch and apply the current job status
    pub async fn poll(&self) -> CoreResult<ImportJobStatus> {
        let generation = self.inner.state.lock().await.generation;

        let status = match self.inner.runner.status().await {
            Ok(status) => status,
            Err(e) => {
                let err = CoreError::from(e);
                err.log("poll_import_status");
                self.inner
                    .log
                    .error(format!("Failed to fetch import status: {}", err));
                return Err(err);
            }
        };

        self.apply_status(status.clone(), generation).await;
        Ok(status)
    }

    async fn apply_status(&self, status: ImportJobStatus, generation: u64) {
        let (completed, next, size, finished) = {
            let mut state = self.inner.state.lock().await;
            if state.generation != generation {
                debug!(running = status.running, "Discarding superseded import status");
                return;
            }

            let completed = if state.phase_active {
                if status.running && state.current_phase == Some(status.media_type) {
                    state.phase_seen_running = true;
                }
                self.completes_phase(&state, &status)
            } else {
                // Watching without a tracked job: report the end of whatever ran
                !status.running && state.last_status.as_ref().is_some_and(|s| s.running)
            };
            state.last_status = Some(status.clone());

            let mut next = None;
            if completed {
                state.phase_active = false;
                state.current_phase = None;
                if state.stop_requested {
                    state.chain.abandon();
                } else {
                    next = state.chain.advance();
                }
            }
            (completed, next, state.size, completed && next.is_none())
        };

        self.emit(ImportEvent::StatusUpdated(status.clone()));

        if completed {
            self.report_completion(&status);
        }
        if finished {
            self.emit(ImportEvent::ChainFinished);
        }
        if let Some(media_type) = next {
            if self.start_phase(media_type, size).await.is_err() {
                self.emit(ImportEvent::ChainFinished);
            }
        }
    }

    fn report_completion(&self, status: &ImportJobStatus) {
        let label = status.media_type.plural_label();
        if status.imported_count > 0 {
            self.inner.log.success(format!(
                "Import of {} finished: {}",
                label,
                status.summary()
            ));
        } else {
            self.inner.log.info(format!(
                "Import of {} finished with nothing new: {}",
                label,
                status.summary()
            ));
        }

        self.emit(ImportEvent::PhaseCompleted {
            media_type: status.media_type,
            imported: status.imported_count,
            skipped: status.skipped_count,
            errors: status.error_count,
        });
        if status.imported_count > 0 {
            self.emit(ImportEvent::RefreshStats);
        }
    }

    /// Fetch catalog totals
    pub async fn refresh_stats(&self) -> CoreResult<ImportStats> {
        self.inner.runner.stats().await.map_err(|e| {
            let err = CoreError::from(e);
            err.log("import_stats");
            self.inner
                .log
                .error(format!("Failed to load catalog stats: {}", err));
            err
        })
    }

    fn claim(state: &mut OrchestratorState, shutdown: &CancellationToken) -> bool {
        if state.polling || shutdown.is_cancelled() {
            return false;
        }
        state.polling = true;
        true
    }

    /// Track a job this orchestrator did not start (resumed or being stopped)
    fn adopt(state: &mut OrchestratorState, media_type: MediaType) {
        state.phase_active = true;
        if state.current_phase != Some(media_type) {
            state.current_phase = Some(media_type);
            state.phase_started_at = None;
        }
        state.phase_seen_running = true;
    }

    /// Whether a non-running `status` ends the tracked job. The first poll
    /// after a start may still show the previous job, so an idle answer only
    /// counts once the job was seen running or a full poll interval passed.
    fn completes_phase(&self, state: &OrchestratorState, status: &ImportJobStatus) -> bool {
        if status.running || state.current_phase != Some(status.media_type) {
            return false;
        }
        state.phase_seen_running
            || state
                .phase_started_at
                .is_some_and(|started| started.elapsed() >= self.inner.settings.poll_interval)
    }

    fn spawn_poll_loop(&self) {
        let this = self.clone();
        let token = self.inner.shutdown.child_token();
        let handle = tokio::spawn(async move { this.poll_loop(token).await });

        let mut task = self
            .inner
            .poll_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *task = Some(handle);
    }

    async fn poll_loop(self, token: CancellationToken) {
        debug!("Import status polling started");

        loop {
            let result = self.poll().await;

            let keep_polling = {
                let mut state = self.inner.state.lock().await;
                let keep = !token.is_cancelled()
                    && match result {
                        Ok(_) => {
                            state.phase_active
                                || state.last_status.as_ref().is_some_and(|s| s.running)
                        }
                        // Transient, try again on the normal cadence
                        Err(_) => true,
                    };
                if !keep {
                    state.polling = false;
                }
                keep
            };
            if !keep_polling {
                break;
            }

            tokio::select! {
                _ = token.cancelled() => {
                    self.inner.state.lock().await.polling = false;
                    break;
                }
                _ = tokio::time::sleep(self.inner.settings.poll_interval) => {}
            }
        }

        debug!("Import status polling stopped");
    }

    /// Wait until no poll loop is running
    pub async fn wait_idle(&self) {
        loop {
            let handle = self
                .inner
                .poll_task
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            let Some(handle) = handle else {
                return;
            };
            if let Err(e) = handle.await {
                warn!(error = %e, "Import poll task failed");
            }
        }
    }

    /// Cancel the poll loop and wait for it to end. No new loop starts
    /// afterwards.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.wait_idle().await;
        self.inner.state.lock().await.polling = false;
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }
}
