//! Recording fakes for the executor and scheduler seams

use crate::analysis::AnalysisScheduler;
use crate::library::{QueryExecutor, QueryRequest};
use crate::types::TrackId;

/// Executor that records submitted requests
#[derive(Debug, Default)]
pub(crate) struct RecordingExecutor {
    pub requests: Vec<QueryRequest>,
}

impl QueryExecutor for RecordingExecutor {
    fn submit(&mut self, request: QueryRequest) {
        self.requests.push(request);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchedulerCall {
    Start(Vec<TrackId>),
    Stop,
}

/// Scheduler that records start and stop calls
#[derive(Debug, Default)]
pub(crate) struct RecordingScheduler {
    pub calls: Vec<SchedulerCall>,
}

impl AnalysisScheduler for RecordingScheduler {
    fn start_analysis(&mut self, tracks: Vec<TrackId>) {
        self.calls.push(SchedulerCall::Start(tracks));
    }

    fn stop_analysis(&mut self) {
        self.calls.push(SchedulerCall::Stop);
    }
}
