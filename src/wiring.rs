//! 配線: 標準アダプタで TourEngine を組み立てる

use std::sync::Arc;

use crate::adapter::{
    ConsoleSink, FileJsonStore, HttpAnalyticsSink, InMemoryStore, KvMetricsSink, NoopLog, StdClock,
};
use crate::catalog::TourCatalog;
use crate::ports::outbound::analytics::AnalyticsSink;
use crate::ports::outbound::clock::Clock;
use crate::ports::outbound::key_value::KeyValueStore;
use crate::ports::outbound::log::Log;
use crate::usecase::TourEngine;

/// 配線: インメモリストアで TourEngine を組み立てる
///
/// コンソール sink とストア内メトリクス sink を積む。TOUR_ANALYTICS_URL が
/// 設定されていれば HTTP sink も積む。
pub fn wire_engine() -> TourEngine {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    wire_engine_with(TourCatalog::builtin(), store, Arc::new(NoopLog))
}

/// 配線: JSON ファイルストアで TourEngine を組み立てる
pub fn wire_engine_with_file_store(
    store: FileJsonStore,
    log: Arc<dyn Log>,
) -> TourEngine {
    wire_engine_with(TourCatalog::builtin(), Arc::new(store), log)
}

/// 配線: カタログ・ストア・ログを差し替えて組み立てる
pub fn wire_engine_with(
    catalog: TourCatalog,
    store: Arc<dyn KeyValueStore>,
    log: Arc<dyn Log>,
) -> TourEngine {
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let mut sinks: Vec<Box<dyn AnalyticsSink>> = vec![
        Box::new(ConsoleSink::new()),
        Box::new(KvMetricsSink::new(Arc::clone(&store))),
    ];
    if let Ok(http) = HttpAnalyticsSink::from_env() {
        sinks.push(Box::new(http));
    }
    TourEngine::new(catalog, store, sinks, clock, log)
}
