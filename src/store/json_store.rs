use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::store::kv::KeyValueStore;
use crate::store::schema::StateFile;

const STATE_FILE: &str = "state.json";

/// Key-value store persisted as a single JSON document. Every `set` rewrites
/// the file through a temp file + rename so a crash never leaves it torn.
pub struct JsonStore {
    base_dir: PathBuf,
    state: StateFile,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data dir {}", base_dir.display()))?;
        let state = load_state(&base_dir.join(STATE_FILE));
        Ok(Self { base_dir, state })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(STATE_FILE)
    }

    fn save(&self) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&self.state)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Option<String> {
        self.state.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.state
            .entries
            .insert(key.to_string(), value.to_string());
        self.state.updated_at = Some(Utc::now());
        self.save()
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ditdah")
}

/// Missing, unreadable, corrupt or stale files all start from an empty state.
fn load_state(path: &Path) -> StateFile {
    if !path.exists() {
        return StateFile::default();
    }
    let parsed = fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<StateFile>(&content).ok());
    match parsed {
        Some(state) if !state.needs_reset() => state,
        Some(state) => {
            tracing::warn!(
                "discarding state file with schema version {}",
                state.schema_version
            );
            StateFile::default()
        }
        None => {
            tracing::warn!("state file {} is unreadable, starting fresh", path.display());
            StateFile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_values_survive_reopen() {
        let (dir, mut store) = make_test_store();
        store.set("ui.theme", "light").unwrap();
        store.set("progress.highest_unlocked_level", "7").unwrap();

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get("ui.theme").as_deref(), Some("light"));
        assert_eq!(
            reopened.get("progress.highest_unlocked_level").as_deref(),
            Some("7")
        );
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, mut store) = make_test_store();
        store.set("k", "v").unwrap();
        assert!(dir.path().join(STATE_FILE).exists());
        assert!(!dir.path().join("state.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STATE_FILE), "{not json").unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_stale_schema_is_reset() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(STATE_FILE),
            r#"{"schema_version": 99, "entries": {"ui.theme": "light"}}"#,
        )
        .unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.get("ui.theme"), None);
    }

    #[test]
    fn test_set_stamps_updated_at() {
        let (_dir, mut store) = make_test_store();
        assert!(store.state.updated_at.is_none());
        store.set("k", "v").unwrap();
        assert!(store.state.updated_at.is_some());
    }
}
