//! 永続化コラボレータの Outbound ポート
//!
//! 完了フラグ・完了レコード・メトリクスの読み書きはすべてこの trait を
//! 経由する。エンジン本体はブラウザストレージか JSON ファイルかを知らない。

use crate::error::Error;

/// 文字列 key-value ストアの抽象
///
/// 1 回の呼び出しは 1 キーの独立した操作で、トランザクション保証は持たない。
/// 存在しないキーの get は Ok(None)、remove は Ok(()) を返す。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}
