use crate::store::kv::KeyValueStore;

pub const PROGRESS_KEY: &str = "progress.highest_unlocked_level";

/// Which catalog levels are selectable. Only the unlock boundary is
/// persisted; the last completed level lives for the process only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressionTracker {
    highest_unlocked: usize,
    last_completed: Option<usize>,
}

impl ProgressionTracker {
    pub fn new(highest_unlocked: usize) -> Self {
        Self {
            highest_unlocked,
            last_completed: None,
        }
    }

    /// Read the stored boundary, treating an absent or unparsable value as 0.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let highest = match store.get(PROGRESS_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("ignoring unparsable progress value {raw:?}");
                0
            }),
            None => 0,
        };
        Self::new(highest)
    }

    pub fn highest_unlocked(&self) -> usize {
        self.highest_unlocked
    }

    pub fn last_completed(&self) -> Option<usize> {
        self.last_completed
    }

    pub fn is_unlocked(&self, level_index: usize) -> bool {
        level_index <= self.highest_unlocked
    }

    /// Number of selectable levels in a catalog of `total` levels.
    pub fn unlocked_count(&self, total: usize) -> usize {
        (self.highest_unlocked + 1).min(total)
    }

    /// Returns true when the boundary moved. A failed write keeps the new
    /// boundary in memory for the rest of the session.
    pub fn record_completion(&mut self, level_index: usize, store: &mut dyn KeyValueStore) -> bool {
        let next = level_index + 1;
        let advanced = next > self.highest_unlocked;
        if advanced {
            self.highest_unlocked = next;
            if let Err(e) = store.set(PROGRESS_KEY, &next.to_string()) {
                tracing::warn!("failed to persist progress: {e:#}");
            }
        }
        self.last_completed = Some(level_index);
        advanced
    }
}
