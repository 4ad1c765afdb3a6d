//! 結果彙總：把求解器取值轉成可展示的記錄

use ppcp_core::{
    AggregatedRecord, Period, PeriodTotal, PlanRecord, PlanningHorizon, Solution, Stage,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 小於此值的取值視為 0（求解器常回傳微小殘差而非精確的 0）
pub const ZERO_TOLERANCE: f64 = 1e-6;

/// 平均成本權重保留的小數位數
const AVERAGE_DECIMALS: u32 = 2;

type GroupKey = (Stage, Period, String, String);

/// 結果彙總器
pub struct ResultAggregator;

impl ResultAggregator {
    /// 將最佳解的取值轉成明細記錄
    ///
    /// 非最佳解回傳空列表。決策變數為整數，取值四捨五入到最近的整數件數。
    /// 記錄依 (階段, 週期) 排序，同組內保留求解器的變數順序。
    pub fn records(solution: &Solution, horizon: &PlanningHorizon) -> Vec<PlanRecord> {
        if !solution.is_optimal() {
            return Vec::new();
        }

        let mut records: Vec<PlanRecord> = solution
            .assignments
            .iter()
            .filter(|a| a.value.is_finite() && a.value >= ZERO_TOLERANCE)
            .filter_map(|a| {
                let quantity = a.value.round() as u64;
                (quantity > 0).then(|| PlanRecord {
                    stage: a.key.stage,
                    period: a.key.period,
                    week_start: horizon.week_start(a.key.period),
                    resource_id: a.key.resource_id.clone(),
                    fabric_id: a.key.fabric_id.clone(),
                    shift: a.key.shift,
                    quantity,
                    cost_weight: a.cost_weight,
                })
            })
            .collect();

        records.sort_by_key(|r| (r.stage, r.period));

        tracing::debug!(
            "取值 {} 筆，非零記錄 {} 筆",
            solution.assignments.len(),
            records.len()
        );

        records
    }

    /// 按 (階段, 週期, 資源, 布料) 分組，合計件數與成本
    pub fn aggregate(records: &[PlanRecord]) -> Vec<AggregatedRecord> {
        let mut groups: BTreeMap<GroupKey, (u64, Decimal)> = BTreeMap::new();

        for record in records {
            let entry = groups
                .entry((
                    record.stage,
                    record.period,
                    record.resource_id.clone(),
                    record.fabric_id.clone(),
                ))
                .or_insert((0, Decimal::ZERO));
            entry.0 += record.quantity;
            entry.1 += record.cost();
        }

        groups
            .into_iter()
            .map(
                |((stage, period, resource_id, fabric_id), (total_quantity, total_cost))| {
                    AggregatedRecord {
                        stage,
                        period,
                        resource_id,
                        fabric_id,
                        total_quantity,
                        total_cost,
                        average_cost_weight: Self::average_cost_weight(total_cost, total_quantity),
                    }
                },
            )
            .collect()
    }

    /// 混合平均成本權重；件數為 0 時回傳 None
    pub fn average_cost_weight(total_cost: Decimal, total_quantity: u64) -> Option<Decimal> {
        if total_quantity == 0 {
            return None;
        }
        total_cost
            .checked_div(Decimal::from(total_quantity))
            .map(|avg| avg.round_dp(AVERAGE_DECIMALS))
    }

    /// 按 (階段, 週期, 資源) 合計產量（圖表資料）
    pub fn period_totals(records: &[PlanRecord]) -> Vec<PeriodTotal> {
        let mut totals: BTreeMap<(Stage, Period, String), u64> = BTreeMap::new();

        for record in records {
            *totals
                .entry((record.stage, record.period, record.resource_id.clone()))
                .or_insert(0) += record.quantity;
        }

        totals
            .into_iter()
            .map(|((stage, period, resource_id), quantity)| PeriodTotal {
                stage,
                period,
                resource_id,
                quantity,
            })
            .collect()
    }

    /// 總成本（所有記錄的成本貢獻合計）
    pub fn total_cost(records: &[PlanRecord]) -> Decimal {
        records.iter().map(PlanRecord::cost).sum()
    }
}
