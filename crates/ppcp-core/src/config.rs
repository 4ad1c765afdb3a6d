//! 生產計劃配置模型（資源、布料、到貨計劃）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::calendar::{Period, PlanningHorizon};
use crate::plan::{Shift, Stage};
use crate::{PlanError, Result};

/// 正常班預設成本權重
pub const DEFAULT_COST_NORMAL: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// 加班預設成本權重
pub const DEFAULT_COST_EXTRA: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// 生產資源（裁剪機台或縫製工坊）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// 資源ID
    pub id: String,

    /// 可加工的布料類型
    pub fabric_types: Vec<String>,

    /// 正常工時週產能（週一到週五）
    pub capacity_normal: u32,

    /// 含加班的週總產能（含週六），必須 >= capacity_normal
    pub capacity_extra: u32,

    /// 正常班單位成本權重
    pub cost_normal: Decimal,

    /// 加班單位成本權重
    pub cost_extra: Decimal,
}

impl Resource {
    /// 創建新的資源（使用預設成本權重 100 / 200）
    pub fn new(
        id: String,
        fabric_types: Vec<String>,
        capacity_normal: u32,
        capacity_extra: u32,
    ) -> Self {
        Self {
            id,
            fabric_types,
            capacity_normal,
            capacity_extra,
            cost_normal: DEFAULT_COST_NORMAL,
            cost_extra: DEFAULT_COST_EXTRA,
        }
    }

    /// 建構器模式：設置成本權重
    pub fn with_costs(mut self, cost_normal: Decimal, cost_extra: Decimal) -> Self {
        self.cost_normal = cost_normal;
        self.cost_extra = cost_extra;
        self
    }

    /// 僅加班的產能區間（capacity_extra - capacity_normal）
    pub fn overtime_capacity(&self) -> u32 {
        self.capacity_extra.saturating_sub(self.capacity_normal)
    }

    /// 班別產能上限
    pub fn shift_capacity(&self, shift: Shift) -> u32 {
        match shift {
            Shift::Normal => self.capacity_normal,
            Shift::Extra => self.overtime_capacity(),
        }
    }

    /// 班別成本權重
    pub fn shift_cost(&self, shift: Shift) -> Decimal {
        match shift {
            Shift::Normal => self.cost_normal,
            Shift::Extra => self.cost_extra,
        }
    }

    /// 檢查是否能加工該布料
    pub fn can_process(&self, fabric_id: &str) -> bool {
        self.fabric_types.iter().any(|f| f == fabric_id)
    }

    /// 驗證資源參數
    pub fn validate(&self) -> Result<()> {
        if self.capacity_extra < self.capacity_normal {
            return Err(PlanError::InvalidCapacity {
                resource_id: self.id.clone(),
                capacity_normal: self.capacity_normal,
                capacity_extra: self.capacity_extra,
            });
        }

        if self.cost_normal < Decimal::ZERO || self.cost_extra < Decimal::ZERO {
            return Err(PlanError::InvalidConfig(format!(
                "資源 {} 的成本權重不可為負",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for fabric in &self.fabric_types {
            if !seen.insert(fabric.as_str()) {
                return Err(PlanError::InvalidConfig(format!(
                    "資源 {} 重複列出布料 {}",
                    self.id, fabric
                )));
            }
        }

        Ok(())
    }
}

/// 布料類型配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricConfig {
    /// 布料ID
    pub id: String,

    /// 每週到貨比例（佔總需求），依週期順序，累計解讀
    pub delivery_schedule: Vec<Decimal>,
}

impl FabricConfig {
    /// 創建新的布料配置
    pub fn new(id: String, delivery_schedule: Vec<Decimal>) -> Self {
        Self {
            id,
            delivery_schedule,
        }
    }

    /// 截至該週的累計到貨比例
    pub fn cumulative_fraction(&self, period: Period) -> Decimal {
        self.delivery_schedule
            .iter()
            .take(period.number() as usize)
            .sum()
    }

    /// 整個時界的到貨比例合計
    pub fn total_fraction(&self) -> Decimal {
        self.delivery_schedule.iter().sum()
    }

    /// 是否在時界內完整到貨
    pub fn is_fully_delivered(&self) -> bool {
        self.total_fraction() == Decimal::ONE
    }

    /// 驗證到貨計劃
    ///
    /// 拒絕：長度與週數不符、負比例、合計超過 1。
    /// 合計不足 1 視為合法（部分到貨），由呼叫端決定是否警告。
    pub fn validate(&self, weeks: u32) -> Result<()> {
        let invalid = |reason: String| PlanError::InvalidDeliverySchedule {
            fabric_id: self.id.clone(),
            reason,
        };

        if self.delivery_schedule.len() != weeks as usize {
            return Err(invalid(format!(
                "需要 {} 週的比例，實際 {} 筆",
                weeks,
                self.delivery_schedule.len()
            )));
        }

        if let Some(negative) = self.delivery_schedule.iter().find(|f| f.is_sign_negative()) {
            return Err(invalid(format!("比例不可為負: {}", negative)));
        }

        let total = self.total_fraction();
        if total > Decimal::ONE {
            return Err(invalid(format!("累計比例 {} 超過 1", total)));
        }

        Ok(())
    }
}

/// 單一資源的產能覆寫（來自使用者輸入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityOverride {
    pub resource_id: String,
    pub capacity_normal: u32,
    pub capacity_extra: u32,

    /// 可選：僅保留這些布料（必須是已宣告能力的子集）
    #[serde(default)]
    pub fabric_types: Option<Vec<String>>,
}

impl CapacityOverride {
    pub fn new(resource_id: String, capacity_normal: u32, capacity_extra: u32) -> Self {
        Self {
            resource_id,
            capacity_normal,
            capacity_extra,
            fabric_types: None,
        }
    }

    /// 建構器模式：限制可加工布料
    pub fn with_fabric_types(mut self, fabric_types: Vec<String>) -> Self {
        self.fabric_types = Some(fabric_types);
        self
    }
}

/// 生產計劃配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// 計劃時界
    pub horizon: PlanningHorizon,

    /// 布料目錄
    pub fabrics: Vec<FabricConfig>,

    /// 裁剪資源
    pub cut_resources: Vec<Resource>,

    /// 縫製資源
    pub sew_resources: Vec<Resource>,
}

impl PlanningConfig {
    /// 創建空白配置
    pub fn new(horizon: PlanningHorizon) -> Self {
        Self {
            horizon,
            fabrics: Vec::new(),
            cut_resources: Vec::new(),
            sew_resources: Vec::new(),
        }
    }

    /// 建構器模式：加入布料
    pub fn with_fabric(mut self, fabric: FabricConfig) -> Self {
        self.fabrics.push(fabric);
        self
    }

    /// 建構器模式：加入資源
    pub fn with_resource(mut self, stage: Stage, resource: Resource) -> Self {
        self.resources_mut(stage).push(resource);
        self
    }

    /// 紡織廠預設配置（2025-09-09 起 4 週，2 種布料，3 台裁剪機，6 家縫製工坊）
    ///
    /// 每次呼叫都會產生新的副本。
    pub fn textile_default() -> Self {
        let plano = "Tecido Plano".to_string();
        let malharia = "Malharia".to_string();
        let pct = |v: i64| Decimal::new(v, 2);

        let cut = [
            ("TX7500 RT Vector A", vec![plano.clone()], 5000, 6000),
            ("TX7500 RT Vector B", vec![malharia.clone()], 9000, 10800),
            ("TX4500 Milenium", vec![plano.clone(), malharia.clone()], 3000, 3600),
        ];
        let sew = [
            ("Dieter Marquart ME", vec![plano.clone()], 4000, 4800),
            ("Joana Rodrigues Confecções SLU LTDA", vec![plano.clone()], 1000, 1200),
            ("Alberto Augusto Confecções", vec![malharia.clone()], 2500, 3000),
            ("3T Confecções EPP (Rio do Sul - SC)", vec![malharia.clone()], 2500, 3000),
            ("3T Confecções EPP (Brusque - SC)", vec![malharia.clone()], 2500, 3000),
            (
                "3T Confecções EPP (Blumenau - SC)",
                vec![plano.clone(), malharia.clone()],
                3000,
                3600,
            ),
        ];

        let start = NaiveDate::from_ymd_opt(2025, 9, 9).unwrap_or_default();
        let mut config = Self::new(PlanningHorizon::new(start, 4))
            .with_fabric(FabricConfig::new(
                plano.clone(),
                vec![pct(30), pct(20), pct(30), pct(20)],
            ))
            .with_fabric(FabricConfig::new(
                malharia.clone(),
                vec![pct(40), pct(30), pct(20), pct(10)],
            ));

        for (id, fabrics, normal, extra) in cut {
            config = config.with_resource(
                Stage::Cut,
                Resource::new(id.to_string(), fabrics, normal, extra),
            );
        }
        for (id, fabrics, normal, extra) in sew {
            config = config.with_resource(
                Stage::Sew,
                Resource::new(id.to_string(), fabrics, normal, extra),
            );
        }

        config
    }

    /// 從 JSON 載入並驗證
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 輸出為 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 某階段的資源列表
    pub fn resources(&self, stage: Stage) -> &[Resource] {
        match stage {
            Stage::Cut => &self.cut_resources,
            Stage::Sew => &self.sew_resources,
        }
    }

    fn resources_mut(&mut self, stage: Stage) -> &mut Vec<Resource> {
        match stage {
            Stage::Cut => &mut self.cut_resources,
            Stage::Sew => &mut self.sew_resources,
        }
    }

    /// 查找資源
    pub fn resource(&self, stage: Stage, resource_id: &str) -> Option<&Resource> {
        self.resources(stage).iter().find(|r| r.id == resource_id)
    }

    /// 查找布料
    pub fn fabric(&self, fabric_id: &str) -> Option<&FabricConfig> {
        self.fabrics.iter().find(|f| f.id == fabric_id)
    }

    /// 驗證整份配置
    pub fn validate(&self) -> Result<()> {
        if self.horizon.is_empty() {
            return Err(PlanError::InvalidConfig("計劃時界至少需要 1 週".to_string()));
        }

        let mut fabric_ids = HashSet::new();
        for fabric in &self.fabrics {
            if !fabric_ids.insert(fabric.id.as_str()) {
                return Err(PlanError::InvalidConfig(format!("布料重複: {}", fabric.id)));
            }
            fabric.validate(self.horizon.weeks)?;
        }

        for stage in Stage::ALL {
            let mut resource_ids = HashSet::new();
            for resource in self.resources(stage) {
                if !resource_ids.insert(resource.id.as_str()) {
                    return Err(PlanError::InvalidConfig(format!(
                        "{} 階段資源重複: {}",
                        stage, resource.id
                    )));
                }
                resource.validate()?;
                if let Some(unknown) = resource
                    .fabric_types
                    .iter()
                    .find(|f| !fabric_ids.contains(f.as_str()))
                {
                    return Err(PlanError::UnknownFabric(unknown.clone()));
                }
            }
        }

        Ok(())
    }

    /// 到貨比例合計不足 1 的布料
    pub fn under_delivered_fabrics(&self) -> Vec<&FabricConfig> {
        self.fabrics
            .iter()
            .filter(|f| !f.is_fully_delivered())
            .collect()
    }

    /// 套用產能覆寫，回傳新的配置副本（自身不變）
    pub fn apply_overrides(
        &self,
        cut_overrides: &[CapacityOverride],
        sew_overrides: &[CapacityOverride],
    ) -> Result<Self> {
        let mut scenario = self.clone();

        for (stage, overrides) in [(Stage::Cut, cut_overrides), (Stage::Sew, sew_overrides)] {
            let mut seen = HashSet::new();
            for row in overrides {
                if !seen.insert(row.resource_id.as_str()) {
                    return Err(PlanError::DuplicateOverride {
                        stage,
                        resource_id: row.resource_id.clone(),
                    });
                }

                let resource = scenario
                    .resources_mut(stage)
                    .iter_mut()
                    .find(|r| r.id == row.resource_id)
                    .ok_or_else(|| PlanError::UnknownResource {
                        stage,
                        resource_id: row.resource_id.clone(),
                    })?;

                if row.capacity_extra < row.capacity_normal {
                    return Err(PlanError::InvalidCapacity {
                        resource_id: row.resource_id.clone(),
                        capacity_normal: row.capacity_normal,
                        capacity_extra: row.capacity_extra,
                    });
                }

                if let Some(fabrics) = &row.fabric_types {
                    if let Some(disallowed) = fabrics.iter().find(|f| !resource.can_process(f)) {
                        return Err(PlanError::DisallowedFabric {
                            resource_id: row.resource_id.clone(),
                            fabric_id: disallowed.clone(),
                        });
                    }
                    resource.fabric_types.retain(|f| fabrics.contains(f));
                }

                resource.capacity_normal = row.capacity_normal;
                resource.capacity_extra = row.capacity_extra;
            }
        }

        Ok(scenario)
    }
}
