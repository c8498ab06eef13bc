//! Sift Core - Recently-added track filtering and analysis run coordination
//!
//! The pieces compose in one direction:
//!
//! ```text
//! UI intents ──► filter (predicate) ──► library (query model) ──► selection
//!                                                                    │
//!                                       analysis (run controller) ◄──┘
//! ```
//!
//! The query executor and the analysis worker pool are collaborators behind
//! traits; [`services`] provides thread-backed implementations of both.

pub mod types;
pub mod error;
pub mod config;
pub mod filter;
pub mod library;
pub mod analysis;
pub mod services;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use types::*;
pub use error::{Result, SiftError};
