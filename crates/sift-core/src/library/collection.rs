//! In-memory track store evaluated by the query service

use super::QueryRequest;
use crate::types::{Track, TrackId};
use chrono::{DateTime, Utc};

/// Tracks known to the library, keyed by [`TrackId`]
#[derive(Debug, Clone, Default)]
pub struct TrackCollection {
    tracks: Vec<Track>,
}

impl TrackCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a track
    ///
    /// Tracks with an invalid identifier are rejected and `false` is returned.
    pub fn upsert(&mut self, track: Track) -> bool {
        if !track.id.is_valid() {
            log::warn!("TrackCollection::upsert: Ignoring track without id: {}", track.title);
            return false;
        }
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(existing) => *existing = track,
            None => self.tracks.push(track),
        }
        true
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Evaluate a request at instant `now`
    ///
    /// The recency predicate and the search text are combined with AND.
    /// Every whitespace-separated search term must appear (case-insensitive)
    /// in the title or the artist. Results are ordered newest first.
    pub fn select(&self, request: &QueryRequest, now: DateTime<Utc>) -> Vec<Track> {
        let terms: Vec<String> = request
            .search_text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut matches: Vec<Track> = self
            .tracks
            .iter()
            .filter(|track| request.filter.matches(track.added_at, now))
            .filter(|track| matches_terms(track, &terms))
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(a.id.cmp(&b.id)));
        matches
    }
}

fn matches_terms(track: &Track, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let title = track.title.to_lowercase();
    let artist = track.artist.as_deref().map(str::to_lowercase);
    terms.iter().all(|term| {
        title.contains(term.as_str())
            || artist.as_deref().is_some_and(|a| a.contains(term.as_str()))
    })
}
