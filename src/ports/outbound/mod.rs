//! Outbound ポート（エンジンが外界へ依存する抽象）

pub mod analytics;
pub mod clock;
pub mod key_value;
pub mod log;
