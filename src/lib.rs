//! マーケットプレイス向けオンボーディングツアーエンジン
//!
//! (role, context) の組に応じた step 列を解決し、進行状態の追跡・完了状態の
//! 永続化・計測イベントの発行を行う。UI フレームワークには依存せず、
//! 永続化・計測・時刻・ログはすべて outbound ポート経由で注入する。

pub mod adapter;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod event_hub;
pub mod ports;
pub mod usecase;
pub mod wiring;

#[cfg(test)]
mod tests;
