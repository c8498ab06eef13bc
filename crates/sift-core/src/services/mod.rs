//! Background services for sift-core
//!
//! The query executor runs on its own thread so `refresh()` never blocks the
//! control thread. Results and analysis notifications come back as
//! [`AppEvent`]s on the [`EventBus`], which the control thread drains and
//! routes into the models.
//!
//! ```text
//! ┌──────────────┐   QueryCommand    ┌──────────────┐
//! │ Control      │ ────────────────► │ QueryService │
//! │ thread       │                   │ (collection) │
//! └──────────────┘                   └──────────────┘
//!        ▲                                  │
//!        │ AppEvent                         │ QueryCompleted
//!        │                                  ▼
//! ┌─────────────────────────────────────────────┐
//! │                  Event Bus                   │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!                       │ AnalysisProgress / AnalysisFinished
//!                ┌──────────────┐
//!                │ AnalysisPool │
//!                └──────────────┘
//! ```

pub mod messages;
pub mod query;

pub use messages::{AppEvent, EventBus, QueryCommand, ServiceHandle};
pub use query::{QueryClient, QueryService, ServiceQueryExecutor};
