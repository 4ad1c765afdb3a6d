//! 需求模型（每次求解請求獨立建立）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::calendar::Period;
use crate::config::{CapacityOverride, FabricConfig, PlanningConfig};
use crate::{PlanError, Result};

/// 本次求解使用的布料類型（需求量 + 到貨計劃）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricType {
    /// 布料ID
    pub id: String,

    /// 整個時界的總需求件數
    pub demand_qty: u32,

    /// 每週到貨比例
    pub delivery_schedule: Vec<Decimal>,
}

impl FabricType {
    /// 由配置與需求量建立
    pub fn from_config(config: &FabricConfig, demand_qty: u32) -> Self {
        Self {
            id: config.id.clone(),
            demand_qty,
            delivery_schedule: config.delivery_schedule.clone(),
        }
    }

    /// 截至該週的累計到貨比例
    pub fn cumulative_fraction(&self, period: Period) -> Decimal {
        self.delivery_schedule
            .iter()
            .take(period.number() as usize)
            .sum()
    }

    /// 截至該週的累計可用原料（件）
    pub fn cumulative_availability(&self, period: Period) -> Decimal {
        self.cumulative_fraction(period) * Decimal::from(self.demand_qty)
    }

    pub fn has_demand(&self) -> bool {
        self.demand_qty > 0
    }
}

/// 求解請求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// 請求ID（用於日誌追蹤）
    pub id: Uuid,

    /// 各布料的需求件數；未列出的布料視為 0
    pub demand: BTreeMap<String, u32>,

    /// 裁剪資源產能覆寫
    #[serde(default)]
    pub cut_overrides: Vec<CapacityOverride>,

    /// 縫製資源產能覆寫
    #[serde(default)]
    pub sew_overrides: Vec<CapacityOverride>,
}

impl PlanRequest {
    /// 創建新的請求
    pub fn new(demand: BTreeMap<String, u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            demand,
            cut_overrides: Vec::new(),
            sew_overrides: Vec::new(),
        }
    }

    /// 預設銷售需求（Tecido Plano 33000 件，Malharia 42000 件）
    pub fn textile_default() -> Self {
        Self::new(BTreeMap::from([
            ("Tecido Plano".to_string(), 33000),
            ("Malharia".to_string(), 42000),
        ]))
    }

    /// 建構器模式：設置需求
    pub fn with_demand(mut self, fabric_id: String, quantity: u32) -> Self {
        self.demand.insert(fabric_id, quantity);
        self
    }

    /// 建構器模式：加入裁剪覆寫
    pub fn with_cut_override(mut self, row: CapacityOverride) -> Self {
        self.cut_overrides.push(row);
        self
    }

    /// 建構器模式：加入縫製覆寫
    pub fn with_sew_override(mut self, row: CapacityOverride) -> Self {
        self.sew_overrides.push(row);
        self
    }

    /// 依配置的布料目錄順序建立本次的布料類型
    ///
    /// 需求中出現配置未知的布料時回傳錯誤。
    pub fn resolve_fabrics(&self, config: &PlanningConfig) -> Result<Vec<FabricType>> {
        if let Some(unknown) = self.demand.keys().find(|id| config.fabric(id).is_none()) {
            return Err(PlanError::UnknownFabric(unknown.clone()));
        }

        Ok(config
            .fabrics
            .iter()
            .map(|f| FabricType::from_config(f, self.demand.get(&f.id).copied().unwrap_or(0)))
            .collect())
    }
}
