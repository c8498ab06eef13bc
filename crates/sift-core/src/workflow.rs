//! Analysis view workflow
//!
//! Glues the query model and the run controller together the way the
//! analysis view drives them: a "recently added" / "all tracks" toggle, a
//! recent-days input, a search box, and a single Analyze button that turns
//! into a Stop button while a run is active.

use crate::analysis::{AnalysisRunController, AnalysisScheduler, RunState};
use crate::config::clamp_recent_days;
use crate::filter::{build_absolute_filter_at, build_relative_filter, empty_filter, DateFormat};
use crate::library::{LibraryQueryModel, QueryExecutor};
use crate::services::AppEvent;
use chrono::{DateTime, Utc};

/// Which tracks the view lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    RecentlyAdded,
    AllTracks,
}

/// State behind the analysis view
pub struct AnalysisWorkflow<E: QueryExecutor, S: AnalysisScheduler> {
    library: LibraryQueryModel<E>,
    runs: AnalysisRunController<S>,
    view_mode: Option<ViewMode>,
    recent_days: u32,
}

impl<E: QueryExecutor, S: AnalysisScheduler> AnalysisWorkflow<E, S> {
    /// Create the workflow with a date snapshot of the last `recent_days` days
    pub fn new(executor: E, scheduler: S, recent_days: u32, date_format: DateFormat) -> Self {
        Self::with_reference(executor, scheduler, recent_days, date_format, Utc::now())
    }

    /// Like [`Self::new`] with an explicit reference instant for the snapshot
    pub fn with_reference(
        executor: E,
        scheduler: S,
        recent_days: u32,
        date_format: DateFormat,
        reference: DateTime<Utc>,
    ) -> Self {
        let recent_days = clamp_recent_days(recent_days);
        let initial = build_absolute_filter_at(recent_days, reference, date_format);
        Self {
            library: LibraryQueryModel::with_filter(executor, initial),
            runs: AnalysisRunController::new(scheduler),
            view_mode: None,
            recent_days,
        }
    }

    pub fn library(&self) -> &LibraryQueryModel<E> {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut LibraryQueryModel<E> {
        &mut self.library
    }

    pub fn runs(&self) -> &AnalysisRunController<S> {
        &self.runs
    }

    pub fn runs_mut(&mut self) -> &mut AnalysisRunController<S> {
        &mut self.runs
    }

    pub fn view_mode(&self) -> Option<ViewMode> {
        self.view_mode
    }

    pub fn recent_days(&self) -> u32 {
        self.recent_days
    }

    /// The view became visible
    ///
    /// Defaults to recently added tracks on first show, and always re-queries
    /// since tracks may have been added elsewhere in the meantime.
    pub fn on_show(&mut self) {
        if self.view_mode.is_none() {
            self.view_mode = Some(ViewMode::RecentlyAdded);
            self.library.set_filter(build_relative_filter(self.recent_days));
        }
        self.library.refresh();
    }

    pub fn show_recent(&mut self) {
        self.view_mode = Some(ViewMode::RecentlyAdded);
        self.library.show_recent_tracks(self.recent_days);
    }

    pub fn show_all(&mut self) {
        self.view_mode = Some(ViewMode::AllTracks);
        self.library.show_all_tracks();
    }

    /// The recent-days input changed
    ///
    /// Values are clamped to 1-3650. The listing only changes while showing
    /// recently added tracks.
    pub fn set_recent_days(&mut self, days: u32) {
        self.recent_days = clamp_recent_days(days);
        if self.view_mode == Some(ViewMode::RecentlyAdded) {
            self.library.show_recent_tracks(self.recent_days);
        }
    }

    /// Search within the tracks the current mode lists
    pub fn on_search(&mut self, text: &str) {
        let predicate = match self.view_mode {
            Some(ViewMode::RecentlyAdded) => build_relative_filter(self.recent_days),
            _ => empty_filter(),
        };
        self.library.search_with_filter(text, predicate);
    }

    /// The Analyze/Stop button was pressed with `rows` selected
    pub fn analyze(&mut self, rows: &[usize]) {
        match self.runs.state() {
            RunState::Idle => {
                let selection = self.library.selection_from_rows(rows);
                self.runs.request_start(selection);
            }
            RunState::Active { .. } => {
                self.runs.request_stop();
            }
        }
    }

    /// Whether the Analyze/Stop button accepts clicks
    pub fn analyze_enabled(&self, has_selection: bool) -> bool {
        has_selection || self.runs.is_active()
    }

    pub fn analyze_button_label(&self) -> &'static str {
        if self.runs.is_active() {
            "Stop Analysis"
        } else {
            "Analyze"
        }
    }

    /// Progress text, empty unless a run is active and has reported progress
    pub fn progress_label(&self) -> String {
        match self.runs.progress() {
            Some(progress) => format!(
                "Analyzing {}/{} ({}%)",
                progress.finished(),
                progress.total(),
                progress.percent()
            ),
            None => String::new(),
        }
    }

    /// Route a service event into the models
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::QueryCompleted(results) => {
                self.library.on_results(results);
            }
            AppEvent::AnalysisProgress { finished, total } => {
                self.runs.on_progress(finished, total);
            }
            AppEvent::AnalysisFinished { .. } => {
                self.runs.on_finished();
            }
            AppEvent::ServiceStarted { service_name } => {
                log::debug!("handle_event: {} started", service_name);
            }
            AppEvent::ServiceStopped { service_name } => {
                log::debug!("handle_event: {} stopped", service_name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisPool;
    use crate::library::{ResultSet, TrackCollection};
    use crate::services::{EventBus, QueryClient, QueryService, ServiceQueryExecutor};
    use crate::testing::{RecordingExecutor, RecordingScheduler, SchedulerCall};
    use crate::types::{Track, TrackId};
    use chrono::TimeZone;
    use std::time::Duration;

    type TestWorkflow = AnalysisWorkflow<RecordingExecutor, RecordingScheduler>;

    fn workflow(days: u32) -> TestWorkflow {
        let reference = Utc.with_ymd_and_hms(2024, 1, 8, 9, 30, 0).unwrap();
        AnalysisWorkflow::with_reference(
            RecordingExecutor::default(),
            RecordingScheduler::default(),
            days,
            DateFormat::Native,
            reference,
        )
    }

    fn last_filter(workflow: &TestWorkflow) -> String {
        workflow
            .library()
            .executor()
            .requests
            .last()
            .map(|r| r.filter.to_string())
            .unwrap_or_default()
    }

    fn deliver(workflow: &mut TestWorkflow, ids: &[i64]) {
        let request = workflow.library().executor().requests.last().unwrap().clone();
        let added = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        workflow.handle_event(AppEvent::QueryCompleted(ResultSet {
            request,
            tracks: ids.iter().map(|&id| Track::new(id, "t", added)).collect(),
        }));
    }

    #[test]
    fn test_initial_filter_is_date_snapshot() {
        let workflow = workflow(7);
        assert_eq!(workflow.library().current_filter().to_string(), "added:>1/1/24");
        assert!(workflow.library().executor().requests.is_empty());
        assert_eq!(workflow.view_mode(), None);
    }

    #[test]
    fn test_first_show_selects_recent() {
        let mut workflow = workflow(7);
        workflow.on_show();
        assert_eq!(workflow.view_mode(), Some(ViewMode::RecentlyAdded));
        assert_eq!(last_filter(&workflow), "added:>-7d");

        workflow.show_all();
        workflow.on_show();
        assert_eq!(workflow.view_mode(), Some(ViewMode::AllTracks));
        assert_eq!(last_filter(&workflow), "");
        assert_eq!(workflow.library().executor().requests.len(), 3);
    }

    #[test]
    fn test_recent_days_change_follows_mode() {
        let mut workflow = workflow(7);
        workflow.show_recent();
        workflow.set_recent_days(30);
        assert_eq!(last_filter(&workflow), "added:>-30d");

        workflow.show_all();
        let before = workflow.library().executor().requests.len();
        workflow.set_recent_days(90);
        assert_eq!(workflow.library().executor().requests.len(), before);
        assert_eq!(workflow.recent_days(), 90);

        workflow.set_recent_days(0);
        assert_eq!(workflow.recent_days(), 1);
        workflow.set_recent_days(10_000);
        assert_eq!(workflow.recent_days(), 3650);
    }

    #[test]
    fn test_search_uses_mode_filter() {
        let mut workflow = workflow(14);
        workflow.show_recent();
        workflow.on_search("acid");
        let request = workflow.library().executor().requests.last().unwrap();
        assert_eq!(request.filter.to_string(), "added:>-14d");
        assert_eq!(request.search_text, "acid");

        workflow.show_all();
        workflow.on_search("acid");
        assert_eq!(last_filter(&workflow), "");
    }

    #[test]
    fn test_analyze_toggles_between_start_and_stop() {
        let mut workflow = workflow(7);
        workflow.on_show();
        deliver(&mut workflow, &[5, 0, 9]);

        assert!(!workflow.analyze_enabled(false));
        assert!(workflow.analyze_enabled(true));
        assert_eq!(workflow.analyze_button_label(), "Analyze");

        workflow.analyze(&[0, 1, 2]);
        assert!(workflow.runs().is_active());
        assert_eq!(workflow.analyze_button_label(), "Stop Analysis");
        assert!(workflow.analyze_enabled(false));

        workflow.analyze(&[0]);
        assert_eq!(
            workflow.runs().scheduler().calls,
            vec![
                SchedulerCall::Start(vec![TrackId(5), TrackId(9)]),
                SchedulerCall::Stop
            ]
        );
        assert!(workflow.runs().is_active());

        workflow.handle_event(AppEvent::AnalysisFinished {
            succeeded: 1,
            failed: 0,
            duration: Duration::from_secs(1),
        });
        assert!(!workflow.runs().is_active());
        assert_eq!(workflow.analyze_button_label(), "Analyze");
    }

    #[test]
    fn test_progress_label() {
        let mut workflow = workflow(7);
        workflow.on_show();
        deliver(&mut workflow, &[1, 2, 3]);
        workflow.analyze(&[0, 1, 2]);
        assert_eq!(workflow.progress_label(), "");

        workflow.handle_event(AppEvent::AnalysisProgress { finished: 1, total: 3 });
        assert_eq!(workflow.progress_label(), "Analyzing 1/3 (33%)");

        workflow.handle_event(AppEvent::AnalysisProgress { finished: 120, total: 100 });
        assert_eq!(workflow.progress_label(), "Analyzing 100/100 (100%)");

        workflow.handle_event(AppEvent::AnalysisFinished {
            succeeded: 3,
            failed: 0,
            duration: Duration::ZERO,
        });
        workflow.handle_event(AppEvent::AnalysisProgress { finished: 60, total: 100 });
        assert_eq!(workflow.progress_label(), "");
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_end_to_end_with_services() {
        let bus = EventBus::new(256);
        let rx = bus.subscribe();

        let handle =
            QueryService::spawn_with_clock(TrackCollection::new(), bus.sender(), fixed_now)
                .unwrap();
        let client = QueryClient::new(&handle);
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap();
        client
            .add_tracks(vec![
                Track::new(1, "Archive", day(1)),
                Track::new(2, "Fresh Cut", day(11)),
                Track::new(3, "Fresh Press", day(13)),
            ])
            .unwrap();

        let pool = AnalysisPool::new(
            |_track: TrackId| -> anyhow::Result<()> { Ok(()) },
            2,
            bus.sender(),
        );
        let mut workflow = AnalysisWorkflow::with_reference(
            ServiceQueryExecutor::new(&handle),
            pool,
            7,
            DateFormat::Iso8601,
            fixed_now(),
        );

        workflow.on_show();
        while workflow.library().is_loading() {
            let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            workflow.handle_event(event);
        }
        let titles: Vec<&str> = workflow
            .library()
            .tracks()
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Fresh Press", "Fresh Cut"]);

        workflow.analyze(&[0, 1]);
        while workflow.runs().is_active() {
            let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            workflow.handle_event(event);
        }
        assert_eq!(workflow.progress_label(), "");

        client.shutdown().unwrap();
    }
}
