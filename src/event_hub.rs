//! AnalyticsHub: 1 回の emit で全 sink へ TourEventRecord を配信する dispatcher
//!
//! sink 失敗時も他 sink への配信は継続し、警告を構造化ログに出す（best-effort）。
//! ts/seq の刻印はここで 1 箇所だけで行い、sink 側は完成済みレコードを受け取る。

use crate::domain::event::{ts_rfc3339, TourEvent, TourEventRecord};
use crate::ports::outbound::analytics::AnalyticsSink;
use crate::ports::outbound::clock::Clock;
use crate::ports::outbound::log::{now_iso8601, Log, LogLevel, LogRecord};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 複数 sink へ順に配信する dispatcher
pub struct AnalyticsHub {
    sinks: Vec<Box<dyn AnalyticsSink>>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
    seq: u64,
}

impl AnalyticsHub {
    pub fn new(sinks: Vec<Box<dyn AnalyticsSink>>, clock: Arc<dyn Clock>, log: Arc<dyn Log>) -> Self {
        Self {
            sinks,
            clock,
            log,
            seq: 0,
        }
    }

    /// 1 イベントを ts/seq 付きで TourEventRecord にし、全 sink へ配信する
    ///
    /// sink 失敗時は他 sink は継続し、警告のみログする。エンジン側へ
    /// エラーは返さない。
    pub fn emit(&mut self, event: TourEvent) {
        self.seq += 1;
        let rec = TourEventRecord {
            v: event.v,
            ts: ts_rfc3339(self.clock.now_ms()),
            seq: self.seq,
            tour_id: event.tour_id,
            kind: event.kind,
            payload: event.payload,
        };

        for (i, sink) in self.sinks.iter_mut().enumerate() {
            if let Err(e) = sink.track(&rec) {
                let mut fields = BTreeMap::new();
                fields.insert("sink".to_string(), serde_json::json!(i));
                fields.insert("kind".to_string(), serde_json::json!(rec.kind));
                fields.insert("error".to_string(), serde_json::json!(e.to_string()));
                let _ = self.log.log(&LogRecord {
                    ts: now_iso8601(),
                    level: LogLevel::Warn,
                    message: "analytics sink failed".to_string(),
                    layer: Some("adapter".to_string()),
                    kind: Some("analytics".to_string()),
                    fields: Some(fields),
                });
            }
        }
    }
}
