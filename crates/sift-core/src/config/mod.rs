//! Configuration for the analysis view
//!
//! Settings are read from YAML. Writing them back is the UI layer's job;
//! components in this crate receive values such as `recent_days` explicitly
//! at each call site.

mod analysis;
mod io;
mod paths;

pub use analysis::{
    clamp_recent_days, AnalysisSettings, DEFAULT_PARALLEL_PROCESSES, DEFAULT_RECENT_DAYS,
    MAX_RECENT_DAYS, MIN_RECENT_DAYS,
};
pub use io::{load_config, read_config};
pub use paths::{default_config_dir, default_config_path};
