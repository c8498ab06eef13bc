//! Analysis run coordination
//!
//! [`AnalysisRunController`] turns a [`TrackSelection`] into a scheduling
//! request and follows the run through progress and completion
//! notifications. [`AnalysisPool`] is a thread-backed scheduler that runs a
//! [`TrackAnalyzer`] over the requested tracks.

mod pool;
mod run;
mod selection;

pub use pool::{AnalysisPool, TrackAnalyzer};
pub use run::{
    progress_percent, AnalysisRunController, AnalysisScheduler, ProgressSnapshot, RunState,
};
pub use selection::TrackSelection;
