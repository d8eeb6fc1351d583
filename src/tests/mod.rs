//! 結合テスト（スタブポートでエンジン全体を回す）

mod support;
