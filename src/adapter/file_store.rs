//! JSON ファイルに永続化する key-value ストア
//!
//! デスクトップ埋め込みやキオスク端末向け。全エントリを 1 つの JSON
//! オブジェクトとして保持し、書き込みごとにファイルへ書き戻す。

use crate::error::Error;
use crate::ports::outbound::key_value::KeyValueStore;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct FileJsonStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileJsonStore {
    /// ファイルを読み込んでストアを開く
    ///
    /// ファイルが無ければ空のストアとして開始する。既存ファイルが JSON
    /// オブジェクトとして読めない場合はエラー。
    ///
    /// # Arguments
    /// * `path` - ストアファイルのパス（例: state/tutorial.json）
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let s = fs::read_to_string(&path)?;
            serde_json::from_str::<HashMap<String, String>>(&s)
                .map_err(|e| Error::json(e.to_string()))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| Error::json(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileJsonStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::io_msg("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::io_msg("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::io_msg("store lock poisoned"))?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tutorial.json");

        {
            let store = FileJsonStore::open(&path).unwrap();
            store.set("tutorial_completed", "true").unwrap();
            store
                .set("tutorial_completed_welcome-producer-dashboard", "true")
                .unwrap();
        }

        // 開き直しても値が残る
        let store = FileJsonStore::open(&path).unwrap();
        assert_eq!(store.get("tutorial_completed").unwrap().as_deref(), Some("true"));
        assert_eq!(
            store
                .get("tutorial_completed_welcome-producer-dashboard")
                .unwrap()
                .as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_remove_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tutorial.json");

        {
            let store = FileJsonStore::open(&path).unwrap();
            store.set("tutorial_completed", "true").unwrap();
            store.remove("tutorial_completed").unwrap();
        }

        let store = FileJsonStore::open(&path).unwrap();
        assert_eq!(store.get("tutorial_completed").unwrap(), None);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileJsonStore::open(tmp.path().join("no-such.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dir").join("tutorial.json");
        let store = FileJsonStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tutorial.json");
        fs::write(&path, "{broken").unwrap();
        assert!(matches!(FileJsonStore::open(&path), Err(Error::Json(_))));
    }
}
