//! # PPCP Optimizer
//!
//! 最佳化模組（建模、限制條件、求解器介面、請求處理）

pub mod builder;
pub mod constraint;
pub mod model;
pub mod planner;
pub mod solver;

// Re-export 主要類型
pub use builder::ModelBuilder;
pub use model::{ConstraintFamily, LinearConstraint, ModelSpec, Sense, VarId};
pub use planner::ProductionPlanner;
pub use solver::{GoodLpSolver, PlanSolver};

use ppcp_calc::{PlanWarning, WarningSeverity};
use ppcp_core::{AggregatedRecord, PeriodTotal, PlanRecord, SolveStatus, Stage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 求解回應
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub request_id: Uuid,
    pub status: SolveStatus,

    /// 相對營運成本分數（僅最佳解時有值）
    pub objective_value: Option<f64>,

    /// 明細記錄
    pub records: Vec<PlanRecord>,

    /// 按 (階段, 週期, 資源, 布料) 的彙總
    pub aggregated: Vec<AggregatedRecord>,

    /// 圖表資料
    pub period_totals: Vec<PeriodTotal>,

    /// 配置提示與驗證結果
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub solve_time_ms: u64,
}

impl PlanResponse {
    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// 給使用者看的結果摘要
    pub fn status_message(&self) -> String {
        match self.status {
            SolveStatus::Optimal => "最佳化完成".to_string(),
            status => format!(
                "找不到最佳解，狀態: {}。請檢查產能與需求限制。",
                status
            ),
        }
    }

    /// 某階段的總產量
    pub fn stage_total(&self, stage: Stage) -> u64 {
        self.records
            .iter()
            .filter(|r| r.stage == stage)
            .map(|r| r.quantity)
            .sum()
    }

    /// 是否有驗證錯誤
    pub fn has_violations(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}
