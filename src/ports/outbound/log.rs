//! 構造化ログの Outbound ポート
//!
//! usecase / adapter / wiring の各レイヤーから JSONL ログを書き出すための trait。
//! ツアーの進行そのものはイベント（計測）側が担い、こちらは運用ログ専用。

use crate::error::Error;
use serde::Serialize;
use std::collections::BTreeMap;

/// 現在時刻を ISO8601 (RFC3339) で返す。LogRecord の `ts` に使う。
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

/// 1 行分のログレコード（JSONL の 1 行に対応）
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// ISO8601 形式のタイムスタンプ
    pub ts: String,
    pub level: LogLevel,
    pub message: String,
    /// 例: usecase, adapter, wiring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// 例: tour, storage, analytics, error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 追加のキー・値（オブジェクトとして出力）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, serde_json::Value>>,
}

/// 構造化ログを出力する Outbound ポート
///
/// 実装は adapter::FileJsonLog（ファイルへ JSONL 追記）や NoopLog（テスト用）など。
pub trait Log: Send + Sync {
    /// 1 レコードをログに書き出す
    fn log(&self, record: &LogRecord) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_record_serialize() {
        let rec = LogRecord {
            ts: "2026-03-14T09:30:00Z".to_string(),
            level: LogLevel::Info,
            message: "tour started".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("tour".to_string()),
            fields: {
                let mut m = BTreeMap::new();
                m.insert("tour_id".to_string(), serde_json::json!("welcome-producer-dashboard"));
                Some(m)
            },
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"ts\":\"2026-03-14T09:30:00Z\""));
        assert!(json.contains("\"level\":\"info\""));
        assert!(json.contains("\"message\":\"tour started\""));
        assert!(json.contains("\"layer\":\"usecase\""));
        assert!(json.contains("\"kind\":\"tour\""));
        assert!(json.contains("\"tour_id\""));
    }

    #[test]
    fn test_optional_fields_omitted() {
        let rec = LogRecord {
            ts: "2026-03-14T09:30:00Z".to_string(),
            level: LogLevel::Warn,
            message: "store write failed".to_string(),
            layer: None,
            kind: None,
            fields: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("layer"));
        assert!(!json.contains("fields"));
    }
}
