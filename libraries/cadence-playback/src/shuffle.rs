//! Shuffle history
//!
//! Shuffle does not reorder the queue. Instead each "next" picks a random
//! track that has not been played in the current cycle, and the ids played so
//! far are kept in the session's [`HistoryStore`] under
//! [`SHUFFLE_HISTORY_KEY`]. Once every track has been played the cycle
//! restarts.

use crate::error::Result;
use crate::store::HistoryStore;
use crate::types::Track;
use rand::seq::IteratorRandom;
use rand::Rng;
use tracing::warn;

/// Store key holding the JSON array of played ids
pub const SHUFFLE_HISTORY_KEY: &str = "shuffled_history";

/// Played-ids set for the current shuffle cycle
pub struct ShuffleHistory {
    store: Box<dyn HistoryStore>,
}

impl ShuffleHistory {
    /// Create a history persisted in `store`
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Ids played in the current cycle, oldest first
    ///
    /// A missing entry is an empty history. A corrupt entry is logged and
    /// treated as empty.
    pub fn ids(&self) -> Vec<String> {
        match self.load() {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable shuffle history");
                Vec::new()
            }
        }
    }

    fn load(&self) -> Result<Vec<String>> {
        match self.store.get(SHUFFLE_HISTORY_KEY) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, ids: &[String]) {
        match serde_json::to_string(ids) {
            Ok(raw) => self.store.set(SHUFFLE_HISTORY_KEY, raw),
            Err(e) => warn!(error = %e, "Failed to encode shuffle history"),
        }
    }

    /// Begin a new cycle that already counts `current` as played
    pub fn start(&mut self, current: Option<&str>) {
        let ids: Vec<String> = current.map(str::to_string).into_iter().collect();
        self.save(&ids);
    }

    /// Forget the cycle entirely
    pub fn clear(&mut self) {
        self.store.remove(SHUFFLE_HISTORY_KEY);
    }

    /// Mark `id` as played
    pub fn record(&mut self, id: &str) {
        let mut ids = self.ids();
        ids.push(id.to_string());
        self.save(&ids);
    }

    /// Whether `id` was played in this cycle
    pub fn contains(&self, id: &str) -> bool {
        self.ids().iter().any(|played| played == id)
    }

    /// Number of ids recorded in this cycle
    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick a uniformly random unplayed track
    ///
    /// Returns its index in `queue`, or `None` when every track has been
    /// played (or the queue is empty).
    pub fn pick_next<R: Rng + ?Sized>(&self, queue: &[Track], rng: &mut R) -> Option<usize> {
        let played = self.ids();

        queue
            .iter()
            .enumerate()
            .filter(|(_, track)| !played.iter().any(|id| *id == track.id))
            .map(|(index, _)| index)
            .choose(rng)
    }
}

impl std::fmt::Debug for ShuffleHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShuffleHistory")
            .field("ids", &self.ids())
            .finish()
    }
}
