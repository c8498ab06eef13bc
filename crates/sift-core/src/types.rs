//! Shared types for sift-core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique key of a library record
///
/// Zero is the unset value and never schedulable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub i64);

impl TrackId {
    /// Whether this identifier refers to a stored record
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A library record as seen by the query layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    /// When the track was added to the library
    pub added_at: DateTime<Utc>,
}

impl Track {
    pub fn new(id: i64, title: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            id: TrackId(id),
            title: title.into(),
            artist: None,
            added_at,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }
}
