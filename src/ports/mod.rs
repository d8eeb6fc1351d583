//! ポート定義（hexagonal architecture の境界）

pub mod outbound;
