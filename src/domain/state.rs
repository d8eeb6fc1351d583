//! ツアー進行の純粋状態機械
//!
//! {Inactive, Active} の 2 状態。遷移はすべて同期・純粋で、永続化や計測などの
//! 効果は usecase 側が遷移の成功を確認してから発行する。

use crate::domain::TourId;
use serde::Serialize;
use thiserror::Error;

/// エンジン操作の事前条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// 実行中ツアーがあるのに force なしで start された
    #[error("tour already active: {0}")]
    AlreadyActive(String),
    /// 非アクティブ状態で advance / retreat / complete / cancel された
    #[error("no active tour")]
    NoActiveTour,
    /// (role, context) から step 列を解決できなかった
    #[error("no steps defined for {0}")]
    NoStepsForContext(String),
}

/// advance / retreat の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMove {
    /// step index が動いた（1 始まり）
    Moved { from: usize, to: usize },
    /// 端にいて動かなかった（最終 step の advance、先頭 step の retreat）
    AtBoundary,
}

/// 進捗スナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub active: bool,
    pub current: usize,
    pub total: usize,
    /// current / total を百分率にして四捨五入した値。非アクティブ時は 0
    pub percentage: u32,
    pub remaining: usize,
}

/// deactivate 時に切り出す、イベント生成と完了記録に必要な情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourExit {
    pub tour_id: TourId,
    /// 終了時点の step index（1 始まり）
    pub exit_step: usize,
    pub total_steps: usize,
    pub started_at_ms: u64,
}

/// ツアー実行状態
///
/// 不変条件: アクティブなら 1 <= current_step <= total_steps かつ
/// total_steps >= 1。非アクティブなら current_step == 0 かつ total_steps == 0。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourState {
    active: bool,
    tour_id: TourId,
    current_step: usize,
    total_steps: usize,
    started_at_ms: u64,
}

impl TourState {
    pub fn inactive() -> Self {
        Self {
            active: false,
            tour_id: TourId::new(""),
            current_step: 0,
            total_steps: 0,
            started_at_ms: 0,
        }
    }

    /// ツアーを開始して step 1 に立つ
    ///
    /// total_steps が 1 以上であることは呼び出し側（catalog / custom steps の
    /// 検証）が保証する。
    pub fn activate(
        &mut self,
        tour_id: TourId,
        total_steps: usize,
        now_ms: u64,
    ) -> Result<(), TourError> {
        if self.active {
            return Err(TourError::AlreadyActive(self.tour_id.0.clone()));
        }
        self.active = true;
        self.tour_id = tour_id;
        self.current_step = 1;
        self.total_steps = total_steps;
        self.started_at_ms = now_ms;
        Ok(())
    }

    /// 次の step へ。最終 step では何もしない（終了は complete が担う）
    pub fn advance(&mut self) -> Result<StepMove, TourError> {
        if !self.active {
            return Err(TourError::NoActiveTour);
        }
        if self.current_step >= self.total_steps {
            return Ok(StepMove::AtBoundary);
        }
        let from = self.current_step;
        self.current_step += 1;
        Ok(StepMove::Moved { from, to: self.current_step })
    }

    /// 前の step へ。先頭 step では何もしない
    pub fn retreat(&mut self) -> Result<StepMove, TourError> {
        if !self.active {
            return Err(TourError::NoActiveTour);
        }
        if self.current_step <= 1 {
            return Ok(StepMove::AtBoundary);
        }
        let from = self.current_step;
        self.current_step -= 1;
        Ok(StepMove::Moved { from, to: self.current_step })
    }

    /// ツアーを終了し、終了時点の情報を切り出して非アクティブへ戻す
    pub fn deactivate(&mut self) -> Result<TourExit, TourError> {
        if !self.active {
            return Err(TourError::NoActiveTour);
        }
        let exit = TourExit {
            tour_id: self.tour_id.clone(),
            exit_step: self.current_step,
            total_steps: self.total_steps,
            started_at_ms: self.started_at_ms,
        };
        self.reset();
        Ok(exit)
    }

    /// 無条件で非アクティブへ戻す（force 再開始用）
    pub fn reset(&mut self) {
        self.active = false;
        self.tour_id = TourId::new("");
        self.current_step = 0;
        self.total_steps = 0;
        self.started_at_ms = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tour_id(&self) -> &TourId {
        &self.tour_id
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// 進捗スナップショットを計算する
    pub fn progress(&self) -> Progress {
        if !self.active {
            return Progress {
                active: false,
                current: 0,
                total: 0,
                percentage: 0,
                remaining: 0,
            };
        }
        let percentage =
            (self.current_step as f64 / self.total_steps as f64 * 100.0).round() as u32;
        Progress {
            active: true,
            current: self.current_step,
            total: self.total_steps,
            percentage,
            remaining: self.total_steps - self.current_step,
        }
    }
}

impl Default for TourState {
    fn default() -> Self {
        Self::inactive()
    }
}
