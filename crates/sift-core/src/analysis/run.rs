//! Analysis run state machine
//!
//! ```text
//!            request_start(selection)
//!   Idle ─────────────────────────────► Active ◄──┐ on_progress(finished, total)
//!    ▲                                    │  └────┘
//!    └──────────── on_finished() ─────────┘
//! ```
//!
//! `request_stop()` only asks the scheduler to cancel. The run stays
//! `Active` until the scheduler confirms with `on_finished()`, so a cancelled
//! run and a completed run end the same way.

use super::TrackSelection;
use crate::types::TrackId;

/// Background analysis worker pool as seen by the controller
///
/// Both calls are fire-and-forget. The pool reports back through
/// [`AnalysisRunController::on_progress`] and
/// [`AnalysisRunController::on_finished`].
pub trait AnalysisScheduler {
    fn start_analysis(&mut self, tracks: Vec<TrackId>);
    fn stop_analysis(&mut self);
}

/// Finished and total work units of an in-flight run
///
/// Only exists for `total > 0`, and `finished <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    finished: usize,
    total: usize,
}

impl ProgressSnapshot {
    /// Build a snapshot, clamping `finished` to `total`
    ///
    /// Returns `None` when `total` is zero since progress is undefined then.
    pub fn new(finished: usize, total: usize) -> Option<Self> {
        (total > 0).then(|| Self {
            finished: finished.min(total),
            total,
        })
    }

    pub fn finished(&self) -> usize {
        self.finished
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> u8 {
        progress_percent(self.finished, self.total).unwrap_or(0)
    }
}

/// `floor(finished * 100 / total)`, clamped to 100; `None` when `total` is zero
pub fn progress_percent(finished: usize, total: usize) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = (finished as u128 * 100) / total as u128;
    Some(percent.min(100) as u8)
}

/// Lifecycle of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Active {
        /// Latest reported progress, `None` until a non-empty total arrives
        progress: Option<ProgressSnapshot>,
    },
}

/// Owns the run state and forwards requests to the scheduler
pub struct AnalysisRunController<S: AnalysisScheduler> {
    scheduler: S,
    state: RunState,
    stop_requested: bool,
}

impl<S: AnalysisScheduler> AnalysisRunController<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: RunState::Idle,
            stop_requested: false,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, RunState::Active { .. })
    }

    pub fn progress(&self) -> Option<ProgressSnapshot> {
        match self.state {
            RunState::Active { progress } => progress,
            RunState::Idle => None,
        }
    }

    /// Whether a stop was sent for the current run and not yet confirmed
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Start a run for `selection`
    ///
    /// An empty selection is still forwarded; the scheduler decides what an
    /// empty request means. Ignored while a run is active, returning `false`.
    pub fn request_start(&mut self, selection: TrackSelection) -> bool {
        if self.is_active() {
            log::warn!("request_start: Ignored, analysis already active");
            return false;
        }

        if selection.is_empty() {
            log::warn!("request_start: No valid tracks selected, sending empty request");
        } else {
            log::info!("request_start: Scheduling {} tracks", selection.len());
        }

        self.state = RunState::Active { progress: None };
        self.stop_requested = false;
        self.scheduler.start_analysis(selection.into_ids());
        true
    }

    /// Ask the scheduler to cancel the active run
    ///
    /// The state stays `Active` until [`Self::on_finished`]. Ignored while idle.
    pub fn request_stop(&mut self) -> bool {
        if !self.is_active() {
            log::debug!("request_stop: Ignored, no active analysis");
            return false;
        }
        log::info!("request_stop: Asking scheduler to stop");
        self.stop_requested = true;
        self.scheduler.stop_analysis();
        true
    }

    /// Record a progress report from the scheduler
    pub fn on_progress(&mut self, finished: usize, total: usize) {
        let RunState::Active { progress } = &mut self.state else {
            log::warn!(
                "on_progress: Ignoring {}/{} received while idle",
                finished,
                total
            );
            return;
        };

        if finished > total && total > 0 {
            log::warn!(
                "on_progress: Finished count {} exceeds total {}, clamping",
                finished,
                total
            );
        }
        *progress = ProgressSnapshot::new(finished, total);
    }

    /// The scheduler finished or cancelled the run
    pub fn on_finished(&mut self) {
        if !self.is_active() {
            log::debug!("on_finished: Already idle");
            return;
        }
        log::info!(
            "on_finished: Analysis run ended{}",
            if self.stop_requested { " (stopped)" } else { "" }
        );
        self.state = RunState::Idle;
        self.stop_requested = false;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
