//! 模型建構：由需求與資源配置產生完整的最佳化模型

use ppcp_core::{FabricType, PlanRequest, PlanningConfig, Shift, Stage, VariableKey};

use crate::constraint::ConstraintSet;
use crate::model::ModelSpec;

/// 模型建構器
///
/// 持有本次請求專屬的配置副本（已套用覆寫），基礎配置不會被修改。
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    scenario: PlanningConfig,
    fabrics: Vec<FabricType>,
}

impl ModelBuilder {
    /// 以已準備好的配置與布料建立
    pub fn new(scenario: PlanningConfig, fabrics: Vec<FabricType>) -> Self {
        Self { scenario, fabrics }
    }

    /// 從請求建立：套用覆寫、驗證配置、解析需求
    ///
    /// 覆寫引用未知資源、或指定資源能力範圍外的布料時回傳配置錯誤。
    pub fn from_request(base: &PlanningConfig, request: &PlanRequest) -> ppcp_core::Result<Self> {
        let scenario = base.apply_overrides(&request.cut_overrides, &request.sew_overrides)?;
        scenario.validate()?;
        let fabrics = request.resolve_fabrics(&scenario)?;

        tracing::debug!(
            "請求配置: 裁剪資源 {} 個，縫製資源 {} 個，覆寫 {} 筆",
            scenario.cut_resources.len(),
            scenario.sew_resources.len(),
            request.cut_overrides.len() + request.sew_overrides.len()
        );

        Ok(Self::new(scenario, fabrics))
    }

    /// 本次使用的配置
    pub fn scenario(&self) -> &PlanningConfig {
        &self.scenario
    }

    /// 本次使用的布料
    pub fn fabrics(&self) -> &[FabricType] {
        &self.fabrics
    }

    /// 建構模型
    pub fn build(&self) -> ModelSpec {
        let mut spec = ModelSpec::new();

        self.add_variables(&mut spec);
        ConstraintSet::add_all(&mut spec, &self.scenario, &self.fabrics);

        tracing::debug!(
            "模型建構完成: 變數 {} 個，限制 {} 條",
            spec.variables().len(),
            spec.constraints().len()
        );

        spec
    }

    /// 為每個 (階段, 週期, 資源, 可加工布料, 班別) 建立一個變數
    fn add_variables(&self, spec: &mut ModelSpec) {
        for stage in Stage::ALL {
            for period in self.scenario.horizon.periods() {
                for resource in self.scenario.resources(stage) {
                    for fabric in self.fabrics.iter().filter(|f| resource.can_process(&f.id)) {
                        for shift in Shift::ALL {
                            spec.add_variable(
                                VariableKey::new(stage, period, &resource.id, &fabric.id, shift),
                                resource.shift_cost(shift),
                                f64::from(resource.shift_capacity(shift)),
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintFamily, Sense};
    use ppcp_core::{CapacityOverride, Period, PlanError};
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    #[test]
    fn test_textile_default_model_size() {
        let builder =
            ModelBuilder::from_request(&PlanningConfig::textile_default(), &PlanRequest::textile_default())
                .unwrap();
        let spec = builder.build();

        // 裁剪 4 個 (資源, 布料) 組合，縫製 7 個；4 週 × 2 班
        assert_eq!(spec.variables().len(), (4 + 7) * 4 * 2);
        assert_eq!(spec.count(ConstraintFamily::Demand), 2);
        assert_eq!(spec.count(ConstraintFamily::ShiftCapacity), (3 + 6) * 4 * 2);
        assert_eq!(spec.count(ConstraintFamily::MaterialAvailability), 2 * 4);
        assert_eq!(spec.count(ConstraintFamily::FlowPrecedence), 2 * 4);
    }

    #[test]
    fn test_variables_respect_capability() {
        let builder =
            ModelBuilder::from_request(&PlanningConfig::textile_default(), &PlanRequest::textile_default())
                .unwrap();
        let spec = builder.build();

        let missing = VariableKey::new(
            Stage::Cut,
            Period::first(),
            "TX7500 RT Vector A",
            "Malharia",
            Shift::Normal,
        );
        assert!(spec.var_id(&missing).is_none());

        let present = VariableKey::new(
            Stage::Cut,
            Period::first(),
            "TX4500 Milenium",
            "Malharia",
            Shift::Extra,
        );
        let id = spec.var_id(&present).unwrap();
        let variable = spec.variable(id).unwrap();
        assert_eq!(variable.cost_weight, Decimal::from(200));
        assert_eq!(variable.upper_bound, 600.0);
    }

    #[test]
    fn test_constraint_right_hand_sides() {
        let spec = ModelBuilder::from_request(
            &PlanningConfig::textile_default(),
            &PlanRequest::textile_default(),
        )
        .unwrap()
        .build();

        let availability = spec
            .constraints()
            .iter()
            .find(|c| c.name == "availability_Tecido Plano_S2")
            .unwrap();
        assert_eq!(availability.rhs, 16500.0);
        assert_eq!(availability.sense, Sense::LessOrEqual);
        // 兩台可裁剪平織布的機台 × 2 週 × 2 班
        assert_eq!(availability.terms.len(), 8);

        let demand = spec
            .constraints()
            .iter()
            .find(|c| c.name == "demand_Malharia")
            .unwrap();
        assert_eq!(demand.rhs, 42000.0);
        assert_eq!(demand.sense, Sense::GreaterOrEqual);

        let flow = spec
            .constraints()
            .iter()
            .find(|c| c.family == ConstraintFamily::FlowPrecedence)
            .unwrap();
        assert!(flow.terms.iter().any(|(_, coef)| *coef < 0.0));
        assert_eq!(flow.rhs, 0.0);
    }

    #[test]
    fn test_availability_bound_is_whole_units() {
        let request = PlanRequest::new(BTreeMap::from([("Malharia".to_string(), 1001)]));
        let spec = ModelBuilder::from_request(&PlanningConfig::textile_default(), &request)
            .unwrap()
            .build();

        // 1001 × 0.40 = 400.4
        let first_week = spec
            .constraints()
            .iter()
            .find(|c| c.name == "availability_Malharia_S1")
            .unwrap();
        assert_eq!(first_week.rhs, 400.0);
    }

    #[test]
    fn test_overrides_do_not_touch_base() {
        let base = PlanningConfig::textile_default();
        let request = PlanRequest::textile_default()
            .with_sew_override(CapacityOverride::new("Dieter Marquart ME".to_string(), 10, 10));

        let builder = ModelBuilder::from_request(&base, &request).unwrap();
        let spec = builder.build();

        let dieter_normal = spec
            .constraints()
            .iter()
            .find(|c| c.name == "normal_cap_Sew_S1_Dieter Marquart ME")
            .unwrap();
        assert_eq!(dieter_normal.rhs, 10.0);

        let overtime = spec
            .constraints()
            .iter()
            .find(|c| c.name == "extra_cap_Sew_S1_Dieter Marquart ME");
        assert_eq!(overtime.unwrap().rhs, 0.0);

        assert_eq!(base, PlanningConfig::textile_default());
    }

    #[test]
    fn test_configuration_errors() {
        let base = PlanningConfig::textile_default();

        let unknown = PlanRequest::textile_default()
            .with_cut_override(CapacityOverride::new("Laser X".to_string(), 1, 2));
        assert!(matches!(
            ModelBuilder::from_request(&base, &unknown),
            Err(PlanError::UnknownResource { .. })
        ));

        let disallowed = PlanRequest::textile_default().with_cut_override(
            CapacityOverride::new("TX7500 RT Vector A".to_string(), 1, 2)
                .with_fabric_types(vec!["Malharia".to_string()]),
        );
        assert!(matches!(
            ModelBuilder::from_request(&base, &disallowed),
            Err(PlanError::DisallowedFabric { .. })
        ));

        let unknown_fabric = PlanRequest::new(BTreeMap::from([("Jeans".to_string(), 5)]));
        assert!(matches!(
            ModelBuilder::from_request(&base, &unknown_fabric),
            Err(PlanError::UnknownFabric(_))
        ));
    }
}
