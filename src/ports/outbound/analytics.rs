//! 計測コラボレータの Outbound ポート

use crate::domain::event::TourEventRecord;
use anyhow::Result;

/// ツアーイベントを 1 件ずつ受け取る sink
///
/// fire-and-forget 前提で、失敗は `event_hub::AnalyticsHub` が警告ログに
/// 落とすだけでエンジンへは伝播しない。`&mut self` なのは sink 側の
/// バッファや接続状態の更新を許すため。
pub trait AnalyticsSink: Send {
    fn track(&mut self, record: &TourEventRecord) -> Result<()>;
}
