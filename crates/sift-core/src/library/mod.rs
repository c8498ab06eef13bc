//! Library query layer
//!
//! [`LibraryQueryModel`] owns the current recency predicate and search text
//! and turns them into [`QueryRequest`]s for a [`QueryExecutor`].
//! [`TrackCollection`] is the in-memory store the query service evaluates
//! requests against.

mod collection;
mod model;

pub use collection::TrackCollection;
pub use model::{LibraryQueryModel, QueryExecutor, QueryRequest, ResultSet};
