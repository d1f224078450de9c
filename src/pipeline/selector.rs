use std::collections::HashSet;

use crate::mood::MoodPolicy;
use crate::spotify::ListeningHistoryEntry;

/// Picks tracks from the mood's rank window of the history.
///
/// Selection is by position only; the policy's energy range is not consulted.
pub struct TrackSelector {
    target: usize,
}

impl TrackSelector {
    pub fn new(target: usize) -> Self {
        Self { target }
    }

    /// At most `min(target, history.len(), window)` entries, in history order.
    pub fn select<'h>(
        &self,
        history: &'h [ListeningHistoryEntry],
        policy: &MoodPolicy,
    ) -> Vec<&'h ListeningHistoryEntry> {
        let mut selected = Vec::new();
        let mut seen = HashSet::new();

        for index in policy.preferred_rank_window.indices() {
            if selected.len() >= self.target {
                break;
            }
            let Some(entry) = history.get(index) else {
                break;
            };
            if seen.insert(entry.id.as_str()) {
                selected.push(entry);
            }
        }

        selected
    }
}
