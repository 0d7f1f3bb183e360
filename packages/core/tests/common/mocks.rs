//! Fake collaborators for core integration tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use marquee_catalog_client::{
    CatalogError, CatalogResult, ImportJobStatus, ImportStats, MediaType,
};
use marquee_core::{ImportJobRunner, MediaElement};

/// Call made against [`ScriptedRunner`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerCall {
    Start(MediaType, u32),
    Stop,
    Status,
    Stats,
}

/// Import job runner answering status polls from a script
///
/// Once the script runs out the last scripted status keeps being returned.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    statuses: Arc<Mutex<VecDeque<CatalogResult<ImportJobStatus>>>>,
    last: Arc<Mutex<Option<ImportJobStatus>>>,
    calls: Arc<Mutex<Vec<RunnerCall>>>,
    start_rejections: Arc<Mutex<HashMap<MediaType, String>>>,
    stop_failures: Arc<Mutex<VecDeque<CatalogError>>>,
    stats: Arc<Mutex<ImportStats>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue status answers
    pub fn script(&self, statuses: impl IntoIterator<Item = ImportJobStatus>) -> &Self {
        self.statuses
            .lock()
            .unwrap()
            .extend(statuses.into_iter().map(Ok));
        self
    }

    /// Queue a failing poll
    pub fn fail_next_poll(&self, error: CatalogError) -> &Self {
        self.statuses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Reject every start request for `media_type` with `reason`
    pub fn reject_start(&self, media_type: MediaType, reason: &str) -> &Self {
        self.start_rejections
            .lock()
            .unwrap()
            .insert(media_type, reason.to_string());
        self
    }

    /// Fail the next stop request with `error`
    pub fn fail_next_stop(&self, error: CatalogError) -> &Self {
        self.stop_failures.lock().unwrap().push_back(error);
        self
    }

    pub fn set_stats(&self, stats: ImportStats) {
        *self.stats.lock().unwrap() = stats;
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn starts(&self) -> Vec<MediaType> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RunnerCall::Start(media_type, _) => Some(media_type),
                _ => None,
            })
            .collect()
    }

    pub fn status_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == RunnerCall::Status)
            .count()
    }

    pub fn pending_statuses(&self) -> usize {
        self.statuses.lock().unwrap().len()
    }
}

#[async_trait]
impl ImportJobRunner for ScriptedRunner {
    async fn start(&self, media_type: MediaType, size: u32) -> CatalogResult<()> {
        if let Some(reason) = self.start_rejections.lock().unwrap().get(&media_type) {
            return Err(CatalogError::Rejected(reason.clone()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(RunnerCall::Start(media_type, size));
        Ok(())
    }

    async fn stop(&self) -> CatalogResult<()> {
        self.calls.lock().unwrap().push(RunnerCall::Stop);
        match self.stop_failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn status(&self) -> CatalogResult<ImportJobStatus> {
        self.calls.lock().unwrap().push(RunnerCall::Status);
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(Ok(status)) => {
                *self.last.lock().unwrap() = Some(status.clone());
                Ok(status)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| ImportJobStatus::idle(MediaType::Movie))),
        }
    }

    async fn stats(&self) -> CatalogResult<ImportStats> {
        self.calls.lock().unwrap().push(RunnerCall::Stats);
        Ok(self.stats.lock().unwrap().clone())
    }
}

/// In-memory media element that plays only when told to
#[derive(Debug, Clone)]
pub struct FakeMediaElement {
    pub time: f64,
    pub duration: f64,
    pub buffered: Vec<(f64, f64)>,
    pub paused: bool,
    pub volume: f64,
    pub muted: bool,
    pub rate: f64,
    pub seeks: Vec<f64>,
}

impl FakeMediaElement {
    pub fn new(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration,
            buffered: Vec::new(),
            paused: false,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            seeks: Vec::new(),
        }
    }
}

impl MediaElement for FakeMediaElement {
    fn current_time(&self) -> f64 {
        self.time
    }
    fn duration(&self) -> f64 {
        self.duration
    }
    fn buffered(&self) -> Vec<(f64, f64)> {
        self.buffered.clone()
    }
    fn paused(&self) -> bool {
        self.paused
    }
    fn ended(&self) -> bool {
        self.time >= self.duration
    }
    fn volume(&self) -> f64 {
        self.volume
    }
    fn muted(&self) -> bool {
        self.muted
    }
    fn playback_rate(&self) -> f64 {
        self.rate
    }
    fn play(&mut self) {
        self.paused = false;
    }
    fn pause(&mut self) {
        self.paused = true;
    }
    fn set_current_time(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.time = seconds;
    }
    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }
    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
    fn request_fullscreen(&mut self) -> bool {
        true
    }
    fn exit_fullscreen(&mut self) {}
}
