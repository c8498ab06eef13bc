//! Thread-backed analysis scheduler
//!
//! Runs a [`TrackAnalyzer`] over the requested tracks on a rayon thread pool
//! and publishes progress on the event bus. Cancellation is cooperative:
//! tracks not yet picked up when the cancel flag is raised are skipped, and
//! `AnalysisFinished` is published either way. Progress reports are dropped
//! while the bus is full; `AnalysisFinished` waits for room.

use super::AnalysisScheduler;
use crate::services::AppEvent;
use crate::types::TrackId;
use crossbeam::channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Computes audio features for one track
pub trait TrackAnalyzer: Send + Sync + 'static {
    fn analyze(&self, track: TrackId) -> anyhow::Result<()>;
}

impl<F> TrackAnalyzer for F
where
    F: Fn(TrackId) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn analyze(&self, track: TrackId) -> anyhow::Result<()> {
        self(track)
    }
}

/// Worker pool implementing [`AnalysisScheduler`]
pub struct AnalysisPool {
    analyzer: Arc<dyn TrackAnalyzer>,
    parallel_processes: u8,
    event_tx: Sender<AppEvent>,
    cancel_flag: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AnalysisPool {
    pub fn new(
        analyzer: impl TrackAnalyzer,
        parallel_processes: u8,
        event_tx: Sender<AppEvent>,
    ) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            parallel_processes,
            event_tx,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Whether a batch is still being processed
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the current batch to end
    pub fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("AnalysisPool: Worker thread panicked");
            }
        }
    }
}

impl AnalysisScheduler for AnalysisPool {
    fn start_analysis(&mut self, tracks: Vec<TrackId>) {
        if self.is_running() {
            log::warn!("AnalysisPool: Previous batch still running, waiting for it");
        }
        self.join();

        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.cancel_flag = cancel_flag.clone();

        let analyzer = self.analyzer.clone();
        let event_tx = self.event_tx.clone();
        let workers = self.parallel_processes.clamp(1, 16) as usize;

        let spawned = thread::Builder::new()
            .name("analysis-pool".into())
            .spawn({
                let event_tx = event_tx.clone();
                move || run_batch(tracks, analyzer, workers, event_tx, cancel_flag)
            });

        match spawned {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => {
                log::error!("AnalysisPool: Failed to spawn worker thread: {}", e);
                let _ = event_tx.try_send(AppEvent::AnalysisFinished {
                    succeeded: 0,
                    failed: 0,
                    duration: Duration::ZERO,
                });
            }
        }
    }

    fn stop_analysis(&mut self) {
        log::info!("AnalysisPool: Cancellation requested");
        self.cancel_flag.store(true, Ordering::Relaxed);
    }
}

impl Drop for AnalysisPool {
    fn drop(&mut self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
        // The worker may be waiting for room on the bus this thread drains
        match self.worker.take() {
            Some(handle) if handle.is_finished() => {
                if handle.join().is_err() {
                    log::error!("AnalysisPool: Worker thread panicked");
                }
            }
            Some(_) => log::debug!("AnalysisPool: Detaching cancelled worker"),
            None => {}
        }
    }
}

fn run_batch(
    tracks: Vec<TrackId>,
    analyzer: Arc<dyn TrackAnalyzer>,
    workers: usize,
    event_tx: Sender<AppEvent>,
    cancel_flag: Arc<AtomicBool>,
) {
    use rayon::prelude::*;

    let start_time = Instant::now();
    let total = tracks.len();
    log::info!(
        "run_batch: Starting analysis of {} tracks on {} workers",
        total,
        workers
    );

    let finish = |succeeded: usize, failed: usize| {
        let duration = start_time.elapsed();
        log::info!(
            "run_batch: Complete in {:.1}s - {} succeeded, {} failed",
            duration.as_secs_f64(),
            succeeded,
            failed
        );
        let _ = event_tx.send(AppEvent::AnalysisFinished {
            succeeded,
            failed,
            duration,
        });
    };

    if total == 0 || cancel_flag.load(Ordering::Relaxed) {
        finish(0, 0);
        return;
    }

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("run_batch: Failed to create thread pool: {}", e);
            finish(0, total);
            return;
        }
    };

    // Counter and send share the lock so reports leave in increasing order
    let finished = Mutex::new(0usize);

    let results: Vec<Option<bool>> = pool.install(|| {
        tracks
            .par_iter()
            .map(|&track| {
                if cancel_flag.load(Ordering::Relaxed) {
                    return None;
                }

                let success = match analyzer.analyze(track) {
                    Ok(()) => true,
                    Err(e) => {
                        log::error!("run_batch: Analysis failed for track {}: {}", track, e);
                        false
                    }
                };

                if let Ok(mut count) = finished.lock() {
                    *count += 1;
                    // A full bus drops the report; the next one supersedes it
                    let _ = event_tx.try_send(AppEvent::AnalysisProgress {
                        finished: *count,
                        total,
                    });
                }
                Some(success)
            })
            .collect()
    });

    let succeeded = results.iter().filter(|r| **r == Some(true)).count();
    let failed = results.iter().filter(|r| **r == Some(false)).count();
    finish(succeeded, failed);
}
