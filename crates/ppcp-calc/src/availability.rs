//! 原料累計可用量

use ppcp_core::{FabricType, Period, PlanningHorizon};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 單週的累計可用量
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityPoint {
    pub period: Period,

    /// 截至本週的累計到貨比例
    pub cumulative_fraction: Decimal,

    /// 截至本週的累計可用件數
    pub available_qty: Decimal,
}

impl AvailabilityPoint {
    /// 求解器使用的上限：裁剪量為整數件，取不超過可用量的最大整數
    pub fn available_units(&self) -> f64 {
        self.available_qty.floor().to_f64().unwrap_or(0.0)
    }
}

/// 累計可用量計算器
pub struct AvailabilityCalculator;

impl AvailabilityCalculator {
    /// 計算布料在整個時界內每週的累計可用量
    ///
    /// 第 t 週的可用量 = (前 t 週比例合計) × 總需求
    pub fn cumulative(fabric: &FabricType, horizon: &PlanningHorizon) -> Vec<AvailabilityPoint> {
        let demand = Decimal::from(fabric.demand_qty);
        let mut running = Decimal::ZERO;

        horizon
            .periods()
            .map(|period| {
                running += fabric
                    .delivery_schedule
                    .get(period.index())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                AvailabilityPoint {
                    period,
                    cumulative_fraction: running,
                    available_qty: running * demand,
                }
            })
            .collect()
    }
}
