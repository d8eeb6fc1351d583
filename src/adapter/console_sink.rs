//! 開発者向けコンソール Sink（TourEventRecord → stderr への要点のみ出力)
//!
//! 既存のロガーには接続せず、stderr に整形して出力する。payload の全量は
//! 出さず要点のみ（巨大化防止）。

use crate::domain::event::{TourEventRecord, KIND_CANCEL};
use crate::ports::outbound::analytics::AnalyticsSink;
use anyhow::Result;
use serde_json::Value;

const PAYLOAD_SUMMARY_MAX: usize = 400;

/// payload の要点だけを短い文字列にする（巨大化防止）
fn payload_summary(payload: &Value) -> String {
    if payload.is_null() || payload.as_object().map(|o| o.is_empty()).unwrap_or(false) {
        return "{}".to_string();
    }
    let s = payload.to_string();
    if s.len() <= PAYLOAD_SUMMARY_MAX {
        return s;
    }
    let truncated = s.chars().take(PAYLOAD_SUMMARY_MAX).collect::<String>();
    format!("{}... (len={})", truncated, s.len())
}

/// 開発中の動作確認用 Sink（stderr に 1 イベント 1 行）
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsSink for ConsoleSink {
    fn track(&mut self, rec: &TourEventRecord) -> Result<()> {
        let summary = payload_summary(&rec.payload);
        if rec.kind == KIND_CANCEL {
            // 離脱は揃えて目立たせる（ファネル分析の手がかり）
            eprintln!("[tour] {} #{} {} cancelled {}", rec.ts, rec.seq, rec.tour_id.0, summary);
        } else {
            eprintln!(
                "[tour] {} #{} {} {} {}",
                rec.ts, rec.seq, rec.tour_id.0, rec.kind, summary
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::KIND_START;
    use crate::domain::TourId;

    #[test]
    fn test_payload_summary_truncates() {
        let long = "x".repeat(PAYLOAD_SUMMARY_MAX * 2);
        let summary = payload_summary(&serde_json::json!({ "body": long }));
        assert!(summary.len() < PAYLOAD_SUMMARY_MAX + 40);
        assert!(summary.contains("... (len="));

        assert_eq!(payload_summary(&serde_json::json!({})), "{}");
        assert_eq!(payload_summary(&Value::Null), "{}");
    }

    #[test]
    fn test_track_never_fails() {
        let mut sink = ConsoleSink::new();
        let rec = TourEventRecord {
            v: 1,
            ts: "2026-03-14T09:30:00+00:00".to_string(),
            seq: 1,
            tour_id: TourId::new("welcome-buyer-marketplace"),
            kind: KIND_START.to_string(),
            payload: serde_json::json!({"role": "buyer"}),
        };
        assert!(sink.track(&rec).is_ok());
    }
}
