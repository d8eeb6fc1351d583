//! インメモリ key-value ストア
//!
//! ブラウザストレージが無い環境（テスト、サーバーサイドレンダリング）向けの
//! 既定実装。プロセスを跨ぐ永続化はしない。

use crate::error::Error;
use crate::ports::outbound::key_value::KeyValueStore;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
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
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::io_msg("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
