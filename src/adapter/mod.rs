//! アダプター（outbound ポートの具象実装）
//!
//! エンジン本体はここのモジュールに直接依存せず、ports::outbound の trait
//! 経由で注入される。実装はインメモリ / ファイル / HTTP / コンソール。

pub mod console_sink;
pub mod file_json_log;
pub mod file_store;
pub mod http_sink;
pub mod kv_metrics;
pub mod memory_store;
pub mod std_clock;

pub use console_sink::ConsoleSink;
pub use file_json_log::{FileJsonLog, NoopLog};
pub use file_store::FileJsonStore;
pub use http_sink::HttpAnalyticsSink;
pub use kv_metrics::{KvMetricsSink, METRICS_KEY, METRICS_MAX_ENTRIES};
pub use memory_store::InMemoryStore;
pub use std_clock::StdClock;
