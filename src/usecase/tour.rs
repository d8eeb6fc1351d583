//! ツアーエンジン（状態遷移と効果のオーケストレーション）
//!
//! 遷移は domain::state の純粋状態機械で先に確定し、成功した遷移についてのみ
//! 永続化と計測イベントを発行する。永続化・計測の失敗は警告ログに落として
//! 握りつぶし、ツアーの進行は止めない。

use crate::catalog::{tour_id_for, TourCatalog};
use crate::domain::completion::CompletionRecord;
use crate::domain::event::{
    ts_rfc3339, TourEvent, KIND_CANCEL, KIND_COMPLETE, KIND_START, KIND_STEP_TRANSITION,
};
use crate::domain::state::{Progress, StepMove, TourError, TourState};
use crate::domain::step::{StepSpec, StepView, TourDefinition};
use crate::domain::{Role, TourContext, TourId};
use crate::error::Error;
use crate::event_hub::AnalyticsHub;
use crate::ports::outbound::analytics::AnalyticsSink;
use crate::ports::outbound::clock::Clock;
use crate::ports::outbound::key_value::KeyValueStore;
use crate::ports::outbound::log::{now_iso8601, Log, LogLevel, LogRecord};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 全ツアー共通の完了フラグのキー
const COMPLETED_FLAG_KEY: &str = "tutorial_completed";

fn tour_flag_key(tour_id: &TourId) -> String {
    format!("tutorial_completed_{}", tour_id)
}

fn tour_data_key(tour_id: &TourId) -> String {
    format!("tutorial_completion_data_{}", tour_id)
}

fn no_steps_error(role: Role, context: TourContext) -> TourError {
    TourError::NoStepsForContext(format!("{}/{}", role.as_str(), context.as_str()))
}

/// start のオプション
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    /// 実行中ツアーがあっても破棄して開始し直す
    pub force: bool,
    /// カタログを使わず、この step 列でツアーを組む
    pub custom_steps: Option<Vec<StepSpec>>,
}

/// start が返すハンドル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourHandle {
    pub tour_id: TourId,
    pub total_steps: usize,
}

/// オンボーディングツアーのエンジン
///
/// 1 インスタンスにつき同時に 1 本のツアーのみ実行する。複数画面で
/// 併走させたい場合はインスタンスを分け、ストアも分けること。
pub struct TourEngine {
    state: TourState,
    /// 実行中ツアーの step 列（非アクティブ時は空）
    steps: Vec<StepSpec>,
    catalog: TourCatalog,
    store: Arc<dyn KeyValueStore>,
    hub: AnalyticsHub,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
}

impl TourEngine {
    pub fn new(
        catalog: TourCatalog,
        store: Arc<dyn KeyValueStore>,
        sinks: Vec<Box<dyn AnalyticsSink>>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
    ) -> Self {
        let hub = AnalyticsHub::new(sinks, Arc::clone(&clock), Arc::clone(&log));
        Self {
            state: TourState::inactive(),
            steps: Vec::new(),
            catalog,
            store,
            hub,
            clock,
            log,
        }
    }

    /// (role, context) のツアーを開始して step 1 に立つ
    ///
    /// step 列は custom_steps、context 固有エントリ、role デフォルトの順で
    /// 解決する。実行中ツアーがある場合は force 指定時のみ破棄して
    /// 開始し直す（破棄分の cancel イベントは出さない）。解決に失敗した
    /// start は force でも実行中ツアーに触れない。
    pub fn start(
        &mut self,
        role: Role,
        context: TourContext,
        options: StartOptions,
    ) -> Result<TourHandle, TourError> {
        if self.state.is_active() && !options.force {
            return Err(TourError::AlreadyActive(self.state.tour_id().0.clone()));
        }

        // 先に step 列を確定させる。失敗時は状態を一切変えない
        let definition = match options.custom_steps {
            Some(steps) => TourDefinition {
                id: tour_id_for(role, context),
                steps,
            },
            None => self
                .catalog
                .resolve(role, context)
                .ok_or_else(|| no_steps_error(role, context))?,
        };
        if definition.steps.is_empty() {
            return Err(no_steps_error(role, context));
        }

        if self.state.is_active() {
            let discarded = self.state.tour_id().0.clone();
            self.state.reset();
            self.steps.clear();
            self.log_info("active tour replaced by forced start", |f| {
                f.insert("discarded".to_string(), json!(discarded));
            });
        }

        let tour_id = definition.id.clone();
        let total_steps = definition.steps.len();

        self.state
            .activate(tour_id.clone(), total_steps, self.clock.now_ms())?;
        self.steps = definition.steps;

        self.hub.emit(TourEvent::new(
            KIND_START,
            tour_id.clone(),
            json!({
                "role": role.as_str(),
                "context": context.as_str(),
                "total_steps": total_steps,
            }),
        ));
        self.log_info("tour started", |f| {
            f.insert("tour_id".to_string(), json!(tour_id.0));
            f.insert("role".to_string(), json!(role.as_str()));
            f.insert("context".to_string(), json!(context.as_str()));
        });

        Ok(TourHandle { tour_id, total_steps })
    }

    /// 次の step へ進む。最終 step では何もしない
    pub fn advance(&mut self) -> Result<(), TourError> {
        match self.state.advance()? {
            StepMove::Moved { from, to } => self.emit_transition("forward", from, to),
            StepMove::AtBoundary => {}
        }
        Ok(())
    }

    /// 前の step へ戻る。先頭 step では何もしない
    pub fn retreat(&mut self) -> Result<(), TourError> {
        match self.state.retreat()? {
            StepMove::Moved { from, to } => self.emit_transition("backward", from, to),
            StepMove::AtBoundary => {}
        }
        Ok(())
    }

    fn emit_transition(&mut self, direction: &str, from: usize, to: usize) {
        let tour_id = self.state.tour_id().clone();
        self.hub.emit(TourEvent::new(
            KIND_STEP_TRANSITION,
            tour_id,
            json!({
                "direction": direction,
                "from": from,
                "to": to,
            }),
        ));
    }

    /// ツアーを完了として終える
    ///
    /// どの step で呼ばれても全 step 分のクレジットで完了レコードを書く。
    /// show_celebration は UI 向けのヒントで、エンジンはログに残すのみ。
    pub fn complete(&mut self, show_celebration: bool) -> Result<CompletionRecord, TourError> {
        let exit = self.state.deactivate()?;
        self.steps.clear();

        let now_ms = self.clock.now_ms();
        let record = CompletionRecord::full_credit(ts_rfc3339(now_ms), exit.total_steps);
        if let Err(e) = self.write_completion(&exit.tour_id, &record) {
            self.log_warn("completion record write failed", |f| {
                f.insert("tour_id".to_string(), json!(exit.tour_id.0));
                f.insert("error".to_string(), json!(e.to_string()));
            });
        }

        self.hub.emit(TourEvent::new(
            KIND_COMPLETE,
            exit.tour_id.clone(),
            json!({
                "duration_ms": now_ms.saturating_sub(exit.started_at_ms),
                "steps_completed": exit.total_steps,
                "total_steps": exit.total_steps,
            }),
        ));
        self.log_info("tour completed", |f| {
            f.insert("tour_id".to_string(), json!(exit.tour_id.0));
            f.insert("show_celebration".to_string(), json!(show_celebration));
        });

        Ok(record)
    }

    fn write_completion(&self, tour_id: &TourId, record: &CompletionRecord) -> Result<(), Error> {
        self.store.set(COMPLETED_FLAG_KEY, "true")?;
        self.store.set(&tour_flag_key(tour_id), "true")?;
        let json = record.to_json().map_err(|e| Error::json(e.to_string()))?;
        self.store.set(&tour_data_key(tour_id), &json)?;
        Ok(())
    }

    /// ツアーを途中で打ち切る。完了状態には何も書かない
    ///
    /// skip_confirmation は UI の確認ダイアログ省略ヒントで、エンジンは
    /// ログに残すのみ。
    pub fn cancel(&mut self, skip_confirmation: bool) -> Result<(), TourError> {
        let exit = self.state.deactivate()?;
        self.steps.clear();

        let now_ms = self.clock.now_ms();
        self.hub.emit(TourEvent::new(
            KIND_CANCEL,
            exit.tour_id.clone(),
            json!({
                "duration_ms": now_ms.saturating_sub(exit.started_at_ms),
                "exit_step": exit.exit_step,
                "steps_completed": exit.exit_step.saturating_sub(1),
            }),
        ));
        self.log_info("tour cancelled", |f| {
            f.insert("tour_id".to_string(), json!(exit.tour_id.0));
            f.insert("exit_step".to_string(), json!(exit.exit_step));
            f.insert("skip_confirmation".to_string(), json!(skip_confirmation));
        });

        Ok(())
    }

    /// 完了済みかをストアから読む
    ///
    /// tour_id 指定時はそのツアーの完了フラグ、None なら全体フラグを見る。
    /// ストアが読めないときは false（未完了扱い）に倒す。
    pub fn is_completed(&self, tour_id: Option<&TourId>) -> bool {
        let key = match tour_id {
            Some(id) => tour_flag_key(id),
            None => COMPLETED_FLAG_KEY.to_string(),
        };
        match self.store.get(&key) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                self.log_warn("completion flag read failed", |f| {
                    f.insert("key".to_string(), json!(key));
                    f.insert("error".to_string(), json!(e.to_string()));
                });
                false
            }
        }
    }

    /// 保存済みの完了レコードを読む（無ければ None）
    pub fn completion_record(&self, tour_id: &TourId) -> Option<CompletionRecord> {
        match self.store.get(&tour_data_key(tour_id)) {
            Ok(Some(json)) => CompletionRecord::parse_json(&json).ok(),
            Ok(None) => None,
            Err(e) => {
                self.log_warn("completion record read failed", |f| {
                    f.insert("tour_id".to_string(), json!(tour_id.0));
                    f.insert("error".to_string(), json!(e.to_string()));
                });
                None
            }
        }
    }

    /// 完了状態を消す
    ///
    /// tour_id 指定時はそのツアーのフラグとレコード、None なら全体フラグ
    /// のみを消す（各ツアーのフラグは残る）。
    pub fn reset(&self, tour_id: Option<&TourId>) {
        let result = match tour_id {
            Some(id) => self
                .store
                .remove(&tour_flag_key(id))
                .and_then(|_| self.store.remove(&tour_data_key(id))),
            None => self.store.remove(COMPLETED_FLAG_KEY),
        };
        if let Err(e) = result {
            self.log_warn("completion reset failed", |f| {
                f.insert("error".to_string(), json!(e.to_string()));
            });
        }
    }

    /// 進捗スナップショット
    pub fn progress(&self) -> Progress {
        self.state.progress()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// 表示中 step のビュー（非アクティブ時は None）
    pub fn current_step(&self) -> Option<StepView<'_>> {
        if !self.state.is_active() {
            return None;
        }
        let index = self.state.current_step();
        let spec = self.steps.get(index - 1)?;
        Some(StepView {
            spec,
            index,
            is_first: index == 1,
            is_last: index == self.state.total_steps(),
        })
    }

    fn log_info(&self, message: &str, fill: impl FnOnce(&mut BTreeMap<String, serde_json::Value>)) {
        self.log_at(LogLevel::Info, message, fill);
    }

    fn log_warn(&self, message: &str, fill: impl FnOnce(&mut BTreeMap<String, serde_json::Value>)) {
        self.log_at(LogLevel::Warn, message, fill);
    }

    fn log_at(
        &self,
        level: LogLevel,
        message: &str,
        fill: impl FnOnce(&mut BTreeMap<String, serde_json::Value>),
    ) {
        let mut fields = BTreeMap::new();
        fill(&mut fields);
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message: message.to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("tour".to_string()),
            fields: if fields.is_empty() { None } else { Some(fields) },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_shapes() {
        let id = TourId::new("welcome-buyer-cart");
        assert_eq!(tour_flag_key(&id), "tutorial_completed_welcome-buyer-cart");
        assert_eq!(tour_data_key(&id), "tutorial_completion_data_welcome-buyer-cart");
    }

    #[test]
    fn test_no_steps_error_names_pair() {
        let err = no_steps_error(Role::Admin, TourContext::Cart);
        assert_eq!(err.to_string(), "no steps defined for admin/cart");
    }
}
