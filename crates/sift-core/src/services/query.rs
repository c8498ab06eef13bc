//! QueryService - Background query executor
//!
//! Owns a [`TrackCollection`] on a dedicated thread. Select requests are
//! evaluated against the clock at execution time, which is what gives
//! relative recency predicates their "N days before now" meaning.

use super::messages::{AppEvent, QueryCommand, ServiceHandle};
use crate::error::{Result, SiftError};
use crate::library::{QueryExecutor, QueryRequest, ResultSet, TrackCollection};
use crate::types::Track;
use chrono::{DateTime, Utc};
use crossbeam::channel::{Receiver, Sender};
use std::thread;

/// Source of the evaluation instant
pub type Clock = fn() -> DateTime<Utc>;

/// QueryService evaluates library queries in a background thread
pub struct QueryService {
    collection: TrackCollection,
    clock: Clock,
    command_rx: Receiver<QueryCommand>,
    event_tx: Sender<AppEvent>,
}

impl QueryService {
    /// Spawn a new QueryService using the wall clock
    pub fn spawn(
        collection: TrackCollection,
        event_tx: Sender<AppEvent>,
    ) -> Result<ServiceHandle<QueryCommand>> {
        Self::spawn_with_clock(collection, event_tx, Utc::now)
    }

    /// Spawn a new QueryService that evaluates requests at `clock()`
    pub fn spawn_with_clock(
        collection: TrackCollection,
        event_tx: Sender<AppEvent>,
        clock: Clock,
    ) -> Result<ServiceHandle<QueryCommand>> {
        let (command_tx, command_rx) = crossbeam::channel::unbounded();

        let service = QueryService {
            collection,
            clock,
            command_rx,
            event_tx: event_tx.clone(),
        };

        let handle = thread::Builder::new()
            .name("query-service".into())
            .spawn(move || {
                service.run();
            })
            .map_err(|e| SiftError::ServiceSpawn(e.to_string()))?;

        let _ = event_tx.send(AppEvent::ServiceStarted {
            service_name: "QueryService".to_string(),
        });

        Ok(ServiceHandle {
            command_tx,
            thread_handle: Some(handle),
        })
    }

    /// Main service loop
    fn run(mut self) {
        log::info!("QueryService started");

        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                QueryCommand::Shutdown => {
                    log::info!("QueryService shutting down");
                    break;
                }
                _ => self.handle_command(cmd),
            }
        }

        let _ = self.event_tx.send(AppEvent::ServiceStopped {
            service_name: "QueryService".to_string(),
        });

        log::info!("QueryService stopped");
    }

    fn handle_command(&mut self, cmd: QueryCommand) {
        match cmd {
            QueryCommand::Select { request } => {
                let tracks = self.collection.select(&request, (self.clock)());
                log::debug!(
                    "QueryService: generation {} matched {} tracks",
                    request.generation,
                    tracks.len()
                );
                let _ = self
                    .event_tx
                    .send(AppEvent::QueryCompleted(ResultSet { request, tracks }));
            }

            QueryCommand::AddTracks { tracks, reply } => {
                let stored = tracks
                    .into_iter()
                    .map(|track| self.collection.upsert(track))
                    .filter(|&stored| stored)
                    .count();
                let _ = reply.send(stored);
            }

            QueryCommand::GetTrackCount { reply } => {
                let _ = reply.send(self.collection.len());
            }

            QueryCommand::Shutdown => {
                // Handled in run() loop
            }
        }
    }
}

/// [`QueryExecutor`] that forwards requests to a running QueryService
#[derive(Clone)]
pub struct ServiceQueryExecutor {
    command_tx: Sender<QueryCommand>,
}

impl ServiceQueryExecutor {
    pub fn new(handle: &ServiceHandle<QueryCommand>) -> Self {
        Self {
            command_tx: handle.command_tx.clone(),
        }
    }
}

impl QueryExecutor for ServiceQueryExecutor {
    fn submit(&mut self, request: QueryRequest) {
        if let Err(e) = self.command_tx.send(QueryCommand::Select { request }) {
            log::warn!("ServiceQueryExecutor: Query service unavailable: {}", e);
        }
    }
}

/// Client for interacting with the QueryService
pub struct QueryClient {
    command_tx: Sender<QueryCommand>,
}

impl QueryClient {
    /// Create a new client from a service handle
    pub fn new(handle: &ServiceHandle<QueryCommand>) -> Self {
        Self {
            command_tx: handle.command_tx.clone(),
        }
    }

    /// Insert or replace tracks (blocking)
    pub fn add_tracks(&self, tracks: Vec<Track>) -> Result<usize> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.command_tx
            .send(QueryCommand::AddTracks { tracks, reply: tx })
            .map_err(|e| SiftError::ServiceUnavailable(e.to_string()))?;

        rx.blocking_recv().map_err(|_| SiftError::ChannelClosed)
    }

    /// Get track count (blocking)
    pub fn track_count(&self) -> Result<usize> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.command_tx
            .send(QueryCommand::GetTrackCount { reply: tx })
            .map_err(|e| SiftError::ServiceUnavailable(e.to_string()))?;

        rx.blocking_recv().map_err(|_| SiftError::ChannelClosed)
    }

    /// Shutdown the service
    pub fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(QueryCommand::Shutdown)
            .map_err(|e| SiftError::ServiceUnavailable(e.to_string()))
    }
}
