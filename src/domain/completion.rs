//! 完了レコード（ストアに永続化する完了証跡）

use serde::{Deserialize, Serialize};

/// ツアー 1 本分の完了レコード
///
/// complete がどの step で呼ばれても全 step 分のクレジットを記録する。
/// 完了操作はツアー全体を終えた意思表示として扱うため、steps_completed は
/// 常に total_steps と等しい。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub completed: bool,
    /// RFC3339 UTC
    pub completed_at: String,
    pub steps_completed: usize,
    pub total_steps: usize,
}

impl CompletionRecord {
    /// 全 step 分のクレジットで完了レコードを作る
    pub fn full_credit(completed_at: impl Into<String>, total_steps: usize) -> Self {
        Self {
            completed: true,
            completed_at: completed_at.into(),
            steps_completed: total_steps,
            total_steps,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn parse_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
