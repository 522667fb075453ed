use ditdah::engine::progression::{PROGRESS_KEY, ProgressionTracker};
use ditdah::store::json_store::JsonStore;
use ditdah::store::kv::{KeyValueStore, MemoryStore};
use ditdah::store::open_store;

#[test]
fn test_progress_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut tracker = ProgressionTracker::load(&store);
        assert!(tracker.record_completion(0, &mut store));
        assert!(tracker.record_completion(1, &mut store));
    }

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let tracker = ProgressionTracker::load(&store);
    assert_eq!(tracker.highest_unlocked(), 2);
    assert!(tracker.is_unlocked(2));
    assert!(!tracker.is_unlocked(3));
    assert_eq!(tracker.last_completed(), None);
}

#[test]
fn test_replaying_old_level_never_lowers_progress() {
    let mut store = MemoryStore::default();
    let mut tracker = ProgressionTracker::load(&store);
    let mut seen = Vec::new();
    for level in [0, 1, 2, 0, 1, 5, 3, 5] {
        tracker.record_completion(level, &mut store);
        seen.push(tracker.highest_unlocked());
    }
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(tracker.highest_unlocked(), 6);
    assert_eq!(store.get(PROGRESS_KEY).as_deref(), Some("6"));
}

#[test]
fn test_unlocked_iff_not_beyond_boundary() {
    let tracker = ProgressionTracker::new(4);
    for i in 0..20 {
        assert_eq!(tracker.is_unlocked(i), i <= 4);
    }
    assert_eq!(tracker.unlocked_count(1009), 5);
    assert_eq!(tracker.unlocked_count(3), 3);
}

#[test]
fn test_garbage_progress_value_loads_as_zero() {
    let mut store = MemoryStore::default();
    store.set(PROGRESS_KEY, "not-a-number").unwrap();
    assert_eq!(ProgressionTracker::load(&store).highest_unlocked(), 0);
}

#[test]
fn test_open_store_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "file, not a directory").unwrap();

    let mut store = open_store(Some(blocker));
    store.set(PROGRESS_KEY, "3").unwrap();
    assert_eq!(store.get(PROGRESS_KEY).as_deref(), Some("3"));
}
