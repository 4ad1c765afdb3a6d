//! 生產計劃模型（決策變數、求解結果、輸出記錄）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::Period;

/// 生產階段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// 裁剪
    Cut,
    /// 縫製
    Sew,
}

impl Stage {
    /// 依流程順序排列
    pub const ALL: [Stage; 2] = [Stage::Cut, Stage::Sew];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Cut => write!(f, "Cut"),
            Stage::Sew => write!(f, "Sew"),
        }
    }
}

/// 班別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// 正常工時（週一到週五）
    Normal,
    /// 加班（週六）
    Extra,
}

impl Shift {
    pub const ALL: [Shift; 2] = [Shift::Normal, Shift::Extra];
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Normal => write!(f, "normal"),
            Shift::Extra => write!(f, "extra"),
        }
    }
}

/// 決策變數鍵：(階段, 週期, 資源, 布料, 班別)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableKey {
    pub stage: Stage,
    pub period: Period,
    pub resource_id: String,
    pub fabric_id: String,
    pub shift: Shift,
}

impl VariableKey {
    pub fn new(
        stage: Stage,
        period: Period,
        resource_id: impl Into<String>,
        fabric_id: impl Into<String>,
        shift: Shift,
    ) -> Self {
        Self {
            stage,
            period,
            resource_id: resource_id.into(),
            fabric_id: fabric_id.into(),
            shift,
        }
    }
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            self.stage, self.period, self.resource_id, self.fabric_id, self.shift
        )
    }
}

/// 求解器回傳的單一變數取值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub key: VariableKey,

    /// 原始取值（可能帶有微小的浮點殘差）
    pub value: f64,

    /// 該班別的單位成本權重
    pub cost_weight: Decimal,
}

/// 求解狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// 求解器未能完成或給出結論
    Undetermined,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        *self == SolveStatus::Optimal
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::Undetermined => "Undetermined",
        };
        f.write_str(label)
    }
}

/// 求解結果
///
/// 只有 `Optimal` 時才帶有目標值與變數取值；其他狀態一律為空。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    pub assignments: Vec<Assignment>,
}

impl Solution {
    /// 創建最佳解
    pub fn optimal(objective_value: f64, assignments: Vec<Assignment>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            objective_value: Some(objective_value),
            assignments,
        }
    }

    /// 創建無解結果（不帶任何取值）
    pub fn without_plan(status: SolveStatus) -> Self {
        Self {
            status,
            objective_value: None,
            assignments: Vec::new(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }
}

/// 計劃明細記錄（每個非零決策變數一筆）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub stage: Stage,
    pub period: Period,

    /// 該週起始日期
    pub week_start: NaiveDate,

    pub resource_id: String,
    pub fabric_id: String,
    pub shift: Shift,

    /// 件數
    pub quantity: u64,

    /// 單位成本權重
    pub cost_weight: Decimal,
}

impl PlanRecord {
    /// 成本貢獻 = 件數 × 成本權重
    pub fn cost(&self) -> Decimal {
        Decimal::from(self.quantity) * self.cost_weight
    }
}

/// 彙總記錄：按 (階段, 週期, 資源, 布料) 分組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub stage: Stage,
    pub period: Period,
    pub resource_id: String,
    pub fabric_id: String,
    pub total_quantity: u64,
    pub total_cost: Decimal,

    /// 混合平均成本權重（總成本 / 總件數，四捨五入到小數兩位）
    pub average_cost_weight: Option<Decimal>,
}

/// 圖表資料：按 (階段, 週期, 資源) 的產量合計
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub stage: Stage,
    pub period: Period,
    pub resource_id: String,
    pub quantity: u64,
}
