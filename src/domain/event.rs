//! 計測イベントドメイン
//!
//! 発火側が作る `TourEvent` と、ts/seq を刻印した永続化用の
//! `TourEventRecord` を定義する。刻印は `event_hub::AnalyticsHub` が行う。

use crate::domain::TourId;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// ツアー開始
pub const KIND_START: &str = "start";
/// step の前進・後退
pub const KIND_STEP_TRANSITION: &str = "step_transition";
/// 完了
pub const KIND_COMPLETE: &str = "complete";
/// 中断
pub const KIND_CANCEL: &str = "cancel";

/// ミリ秒の epoch 時刻を RFC3339 UTC 文字列にする
pub fn ts_rfc3339(ms: u64) -> String {
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

/// 発火側が作るイベント（ts/seq は未設定）
#[derive(Debug, Clone, PartialEq)]
pub struct TourEvent {
    /// スキーマバージョン（将来拡張用）
    pub v: u32,
    pub tour_id: TourId,
    /// 種別（KIND_START / KIND_STEP_TRANSITION / KIND_COMPLETE / KIND_CANCEL）
    pub kind: String,
    /// 種別ごとの任意ペイロード
    pub payload: serde_json::Value,
}

impl TourEvent {
    pub fn new(kind: &str, tour_id: TourId, payload: serde_json::Value) -> Self {
        Self {
            v: 1,
            tour_id,
            kind: kind.to_string(),
            payload,
        }
    }
}

/// 永続化用イベント（ts/seq が埋まった最終形）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourEventRecord {
    pub v: u32,
    /// RFC3339 UTC
    pub ts: String,
    /// エンジン内連番（1 始まり）
    pub seq: u64,
    pub tour_id: TourId,
    pub kind: String,
    pub payload: serde_json::Value,
}
