//! ストア内リングバッファにイベントを蓄積する Sink
//!
//! 外部の計測基盤が使えない環境向けのローカルメトリクス。1 キーに JSON
//! 配列として保持し、上限を超えたら古いものから捨てる。

use crate::domain::event::TourEventRecord;
use crate::ports::outbound::analytics::AnalyticsSink;
use crate::ports::outbound::key_value::KeyValueStore;
use anyhow::Result;
use std::sync::Arc;

/// メトリクス配列を保持するストアキー
pub const METRICS_KEY: &str = "tutorial_metrics";
/// 保持する最大件数。超過分は先頭（最古）から捨てる
pub const METRICS_MAX_ENTRIES: usize = 100;

/// KeyValueStore にイベント履歴を書き溜める Sink
pub struct KvMetricsSink {
    store: Arc<dyn KeyValueStore>,
}

impl KvMetricsSink {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl AnalyticsSink for KvMetricsSink {
    fn track(&mut self, rec: &TourEventRecord) -> Result<()> {
        let mut entries: Vec<TourEventRecord> = match self.store.get(METRICS_KEY)? {
            // 壊れた値は捨てて空からやり直す
            Some(json) => serde_json::from_str(&json).unwrap_or_default(),
            None => Vec::new(),
        };
        entries.push(rec.clone());
        if entries.len() > METRICS_MAX_ENTRIES {
            let overflow = entries.len() - METRICS_MAX_ENTRIES;
            entries.drain(..overflow);
        }
        let json = serde_json::to_string(&entries)?;
        self.store.set(METRICS_KEY, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryStore;
    use crate::domain::event::KIND_STEP_TRANSITION;
    use crate::domain::TourId;

    fn record(seq: u64) -> TourEventRecord {
        TourEventRecord {
            v: 1,
            ts: "2026-03-14T09:30:00+00:00".to_string(),
            seq,
            tour_id: TourId::new("welcome-producer-dashboard"),
            kind: KIND_STEP_TRANSITION.to_string(),
            payload: serde_json::json!({"direction": "forward"}),
        }
    }

    fn stored_entries(store: &InMemoryStore) -> Vec<TourEventRecord> {
        let json = store.get(METRICS_KEY).unwrap().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_appends_records() {
        let store = Arc::new(InMemoryStore::new());
        let mut sink = KvMetricsSink::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        sink.track(&record(1)).unwrap();
        sink.track(&record(2)).unwrap();

        let entries = stored_entries(&store);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seq, 1);
        assert_eq!(entries[1].seq, 2);
    }

    #[test]
    fn test_ring_drops_oldest_beyond_limit() {
        let store = Arc::new(InMemoryStore::new());
        let mut sink = KvMetricsSink::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        for seq in 1..=(METRICS_MAX_ENTRIES as u64 + 2) {
            sink.track(&record(seq)).unwrap();
        }

        let entries = stored_entries(&store);
        assert_eq!(entries.len(), METRICS_MAX_ENTRIES);
        // 最古の 2 件（seq 1, 2）が落ちている
        assert_eq!(entries[0].seq, 3);
        assert_eq!(entries.last().unwrap().seq, METRICS_MAX_ENTRIES as u64 + 2);
    }

    #[test]
    fn test_corrupt_history_starts_over() {
        let store = Arc::new(InMemoryStore::new());
        store.set(METRICS_KEY, "not json").unwrap();
        let mut sink = KvMetricsSink::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);

        sink.track(&record(9)).unwrap();

        let entries = stored_entries(&store);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].seq, 9);
    }
}
