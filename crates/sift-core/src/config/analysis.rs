//! Analysis view settings

use crate::filter::DateFormat;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RECENT_DAYS: u32 = 7;
pub const MIN_RECENT_DAYS: u32 = 1;
/// Roughly ten years
pub const MAX_RECENT_DAYS: u32 = 3650;
pub const DEFAULT_PARALLEL_PROCESSES: u8 = 4;

/// Settings for the recently-added analysis view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Width of the "recently added" window in days (1-3650)
    pub recent_days: u32,
    /// Format of absolute date literals in recency predicates
    pub date_format: DateFormat,
    /// Number of parallel analysis workers (1-16)
    pub parallel_processes: u8,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            recent_days: DEFAULT_RECENT_DAYS,
            date_format: DateFormat::default(),
            parallel_processes: DEFAULT_PARALLEL_PROCESSES,
        }
    }
}

impl AnalysisSettings {
    /// Clamp values into their supported ranges
    pub fn validate(&mut self) {
        self.recent_days = clamp_recent_days(self.recent_days);
        self.parallel_processes = self.parallel_processes.clamp(1, 16);
    }

    /// Load settings and clamp them into range
    pub fn load(path: &std::path::Path) -> Self {
        let mut settings: Self = super::load_config(path);
        settings.validate();
        log::info!(
            "AnalysisSettings::load: recent_days={}, date_format={:?}, parallel_processes={}",
            settings.recent_days,
            settings.date_format,
            settings.parallel_processes
        );
        settings
    }
}

/// Clamp a recent-days value into the range the input boundary accepts
pub fn clamp_recent_days(days: u32) -> u32 {
    days.clamp(MIN_RECENT_DAYS, MAX_RECENT_DAYS)
}
