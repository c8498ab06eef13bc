//! Track identifiers gathered from selected rows

use crate::types::TrackId;
use std::collections::HashSet;

/// Ordered, duplicate-free set of schedulable track identifiers
///
/// Built at the moment a run is requested and consumed by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelection {
    ids: Vec<TrackId>,
}

impl TrackSelection {
    /// Collect identifiers in iteration order, skipping invalid and repeated ones
    pub fn from_ids(ids: impl IntoIterator<Item = TrackId>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .filter(|id| id.is_valid() && seen.insert(*id))
            .collect();
        Self { ids }
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_ids(self) -> Vec<TrackId> {
        self.ids
    }
}

impl FromIterator<TrackId> for TrackSelection {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_ids_are_skipped_in_order() {
        let selection = TrackSelection::from_ids([5, 0, 9].map(TrackId));
        assert_eq!(selection.ids(), &[TrackId(5), TrackId(9)]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let selection: TrackSelection = [3, 1, 3, 2, 1].into_iter().map(TrackId).collect();
        assert_eq!(selection.into_ids(), vec![TrackId(3), TrackId(1), TrackId(2)]);
    }

    #[test]
    fn test_all_invalid_is_empty() {
        let selection = TrackSelection::from_ids([TrackId(0), TrackId(0)]);
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }
}
