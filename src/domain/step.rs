//! Step 定義（ツアー 1 本分の静的な内容）

use crate::domain::TourId;
use serde::{Deserialize, Serialize};

/// ツアー内の 1 step
///
/// `target_selector` はハイライト対象要素の CSS セレクタ。ヘッドレスでは
/// 不透明な文字列として運ぶだけで、解釈は UI 側に任せる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub title: String,
    pub body: String,
    pub target_selector: String,
}

impl StepSpec {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        target_selector: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            target_selector: target_selector.into(),
        }
    }
}

/// 解決済みツアー定義（識別子 + step 列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourDefinition {
    pub id: TourId,
    pub steps: Vec<StepSpec>,
}

impl TourDefinition {
    pub fn new(id: impl Into<TourId>, steps: Vec<StepSpec>) -> Self {
        Self { id: id.into(), steps }
    }
}

/// 表示中 step のビュー（index は 1 始まり）
///
/// is_first / is_last は UI の「戻る」「次へ/完了」ボタンの出し分けに使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepView<'a> {
    pub spec: &'a StepSpec,
    pub index: usize,
    pub is_first: bool,
    pub is_last: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_spec_serialize() {
        let step = StepSpec::new("Bienvenido", "Este es tu panel principal.", "#dashboard-header");
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"title\":\"Bienvenido\""));
        assert!(json.contains("\"target_selector\":\"#dashboard-header\""));

        let back: StepSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_definition_holds_id_and_steps() {
        let def = TourDefinition::new(
            "welcome-admin-dashboard",
            vec![StepSpec::new("a", "b", "#c")],
        );
        assert_eq!(def.id.0, "welcome-admin-dashboard");
        assert_eq!(def.steps.len(), 1);
    }
}
