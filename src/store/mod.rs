pub mod json_store;
pub mod kv;
pub mod schema;

use std::path::PathBuf;

use json_store::JsonStore;
use kv::{KeyValueStore, MemoryStore};

/// Open the on-disk store, or fall back to memory so the session can go on.
pub fn open_store(data_dir: Option<PathBuf>) -> Box<dyn KeyValueStore> {
    let result = match data_dir {
        Some(dir) => JsonStore::with_base_dir(dir),
        None => JsonStore::new(),
    };
    match result {
        Ok(store) => {
            tracing::debug!("using state store in {}", store.base_dir().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("state store unavailable, progress will not be saved: {e:#}");
            Box::new(MemoryStore::default())
        }
    }
}
