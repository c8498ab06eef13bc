//! Message types for service communication
//!
//! Commands flow to a service over its command channel. Replies that the
//! caller waits for use oneshot channels; everything else is published as an
//! [`AppEvent`].

use crate::library::{QueryRequest, ResultSet};
use crate::types::Track;
use std::time::Duration;

// ============================================================================
// Query Commands
// ============================================================================

/// Commands sent to the QueryService
pub enum QueryCommand {
    /// Evaluate a request; the result is published as `AppEvent::QueryCompleted`
    Select { request: QueryRequest },

    /// Insert or replace tracks, replying with the number stored
    AddTracks {
        tracks: Vec<Track>,
        reply: tokio::sync::oneshot::Sender<usize>,
    },

    /// Get total track count
    GetTrackCount {
        reply: tokio::sync::oneshot::Sender<usize>,
    },

    /// Shutdown the service
    Shutdown,
}

// ============================================================================
// Application Events (Broadcast)
// ============================================================================

/// Events published by services and the analysis pool
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A query finished evaluating
    QueryCompleted(ResultSet),

    /// Analysis pool progress, `finished` is non-decreasing within a run
    AnalysisProgress { finished: usize, total: usize },

    /// The analysis pool ended a run, completed or cancelled
    AnalysisFinished {
        succeeded: usize,
        failed: usize,
        duration: Duration,
    },

    /// A service started
    ServiceStarted { service_name: String },

    /// A service stopped
    ServiceStopped { service_name: String },
}

// ============================================================================
// Service Handle
// ============================================================================

/// Handle for communicating with a background service
pub struct ServiceHandle<Cmd> {
    /// Channel for sending commands to the service
    pub command_tx: crossbeam::channel::Sender<Cmd>,
    /// Thread handle for the service
    pub thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl<Cmd> ServiceHandle<Cmd> {
    /// Send a command to the service
    pub fn send(&self, cmd: Cmd) -> Result<(), crossbeam::channel::SendError<Cmd>> {
        self.command_tx.send(cmd)
    }

    /// Check if the service is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the service thread to exit
    pub fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("ServiceHandle: Service thread panicked");
            }
        }
    }
}

/// Event bus shared by services and the control thread
pub struct EventBus {
    sender: crossbeam::channel::Sender<AppEvent>,
    receiver: crossbeam::channel::Receiver<AppEvent>,
}

impl EventBus {
    /// Create a new event bus with bounded capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam::channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Get a sender for publishing events
    pub fn sender(&self) -> crossbeam::channel::Sender<AppEvent> {
        self.sender.clone()
    }

    /// Get a receiver for subscribing to events
    pub fn subscribe(&self) -> crossbeam::channel::Receiver<AppEvent> {
        self.receiver.clone()
    }

    /// Publish an event
    pub fn publish(&self, event: AppEvent) -> Result<(), crossbeam::channel::SendError<AppEvent>> {
        self.sender.send(event)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
