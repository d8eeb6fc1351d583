//! 時刻取得の Outbound ポート

/// 現在時刻の抽象
///
/// 本番は `adapter::std_clock::StdClock`、テストでは固定時刻や手動で進める
/// 実装を注入する。所要時間の計測と ts の刻印はすべてこの trait を通す。
pub trait Clock: Send + Sync {
    /// Unix epoch からの経過ミリ秒
    fn now_ms(&self) -> u64;
}
