//! テスト用スタブ（ポートの差し替え実装とエンジン組み立て）

use crate::adapter::{InMemoryStore, NoopLog};
use crate::catalog::TourCatalog;
use crate::domain::event::TourEventRecord;
use crate::error::Error;
use crate::ports::outbound::analytics::AnalyticsSink;
use crate::ports::outbound::clock::Clock;
use crate::ports::outbound::key_value::KeyValueStore;
use crate::usecase::TourEngine;
use std::sync::{Arc, Mutex};

/// テスト開始時の基準時刻（2026-03-14T09:30:00Z）
pub const T0_MS: u64 = 1_773_480_600_000;

/// 手動で進める時計
pub struct ManualClock(Mutex<u64>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Arc<Self> {
        Arc::new(Self(Mutex::new(start_ms)))
    }

    pub fn advance(&self, delta_ms: u64) {
        *self.0.lock().unwrap() += delta_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        *self.0.lock().unwrap()
    }
}

/// 受け取ったレコードを蓄積する sink（Arc で共有）
pub struct CollectSink(pub Arc<Mutex<Vec<TourEventRecord>>>);

impl AnalyticsSink for CollectSink {
    fn track(&mut self, rec: &TourEventRecord) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(rec.clone());
        Ok(())
    }
}

/// 全操作が失敗するストア（永続化断のシミュレーション）
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        Err(Error::io_msg("store offline"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
        Err(Error::io_msg("store offline"))
    }

    fn remove(&self, _key: &str) -> Result<(), Error> {
        Err(Error::io_msg("store offline"))
    }
}

/// エンジンと、検証用に共有したポート一式
pub struct TestRig {
    pub engine: TourEngine,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<Mutex<Vec<TourEventRecord>>>,
}

impl TestRig {
    pub fn event_kinds(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|e| e.kind.clone()).collect()
    }
}

/// 組み込みカタログでエンジンを組む
pub fn rig() -> TestRig {
    rig_with_catalog(TourCatalog::builtin())
}

/// カタログを差し替えてエンジンを組む
pub fn rig_with_catalog(catalog: TourCatalog) -> TestRig {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(T0_MS);
    let events = Arc::new(Mutex::new(Vec::new()));
    let engine = TourEngine::new(
        catalog,
        Arc::clone(&store) as Arc<dyn KeyValueStore>,
        vec![Box::new(CollectSink(Arc::clone(&events)))],
        Arc::clone(&clock) as Arc<dyn Clock>,
        Arc::new(NoopLog),
    );
    TestRig {
        engine,
        store,
        clock,
        events,
    }
}
