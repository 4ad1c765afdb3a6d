//! 限制條件（需求、班別產能、原料可用量、流程先後）

use ppcp_calc::AvailabilityCalculator;
use ppcp_core::{FabricType, Period, PlanningConfig, Shift, Stage};

use crate::model::{ConstraintFamily, LinearConstraint, ModelSpec, Sense, VarId};

/// 限制條件產生器
pub struct ConstraintSet;

impl ConstraintSet {
    /// 產生全部四類限制
    pub fn add_all(spec: &mut ModelSpec, config: &PlanningConfig, fabrics: &[FabricType]) {
        Self::add_demand(spec, fabrics);
        Self::add_shift_capacity(spec, config);
        Self::add_material_availability(spec, config, fabrics);
        Self::add_flow_precedence(spec, config, fabrics);

        tracing::debug!(
            "限制條件: 需求 {}, 產能 {}, 原料 {}, 流程 {}",
            spec.count(ConstraintFamily::Demand),
            spec.count(ConstraintFamily::ShiftCapacity),
            spec.count(ConstraintFamily::MaterialAvailability),
            spec.count(ConstraintFamily::FlowPrecedence)
        );
    }

    /// 每種布料：所有週期、資源、班別的縫製量合計 >= 需求
    pub fn add_demand(spec: &mut ModelSpec, fabrics: &[FabricType]) {
        for fabric in fabrics {
            let vars = spec.select(|k| k.stage == Stage::Sew && k.fabric_id == fabric.id);
            spec.add_constraint(LinearConstraint::new(
                format!("demand_{}", fabric.id),
                ConstraintFamily::Demand,
                unit_terms(vars),
                Sense::GreaterOrEqual,
                f64::from(fabric.demand_qty),
            ));
        }
    }

    /// 每週每資源：正常班合計 <= capacity_normal，加班合計 <= capacity_extra - capacity_normal
    pub fn add_shift_capacity(spec: &mut ModelSpec, config: &PlanningConfig) {
        for period in config.horizon.periods() {
            for stage in Stage::ALL {
                for resource in config.resources(stage) {
                    for shift in Shift::ALL {
                        let vars = spec.select(|k| {
                            k.stage == stage
                                && k.period == period
                                && k.resource_id == resource.id
                                && k.shift == shift
                        });
                        if vars.is_empty() {
                            continue;
                        }
                        spec.add_constraint(LinearConstraint::new(
                            format!("{}_cap_{}_{}_{}", shift, stage, period, resource.id),
                            ConstraintFamily::ShiftCapacity,
                            unit_terms(vars),
                            Sense::LessOrEqual,
                            f64::from(resource.shift_capacity(shift)),
                        ));
                    }
                }
            }
        }
    }

    /// 每週每布料：第 1..t 週累計裁剪 <= 截至第 t 週的累計到貨
    pub fn add_material_availability(
        spec: &mut ModelSpec,
        config: &PlanningConfig,
        fabrics: &[FabricType],
    ) {
        for fabric in fabrics {
            for point in AvailabilityCalculator::cumulative(fabric, &config.horizon) {
                let vars = cumulative_vars(spec, Stage::Cut, &fabric.id, point.period);
                spec.add_constraint(LinearConstraint::new(
                    format!("availability_{}_{}", fabric.id, point.period),
                    ConstraintFamily::MaterialAvailability,
                    unit_terms(vars),
                    Sense::LessOrEqual,
                    point.available_units(),
                ));
            }
        }
    }

    /// 每週每布料：累計縫製 - 累計裁剪 <= 0
    pub fn add_flow_precedence(
        spec: &mut ModelSpec,
        config: &PlanningConfig,
        fabrics: &[FabricType],
    ) {
        for fabric in fabrics {
            for period in config.horizon.periods() {
                let sewn = cumulative_vars(spec, Stage::Sew, &fabric.id, period);
                let cut = cumulative_vars(spec, Stage::Cut, &fabric.id, period);

                let terms = sewn
                    .into_iter()
                    .map(|id| (id, 1.0))
                    .chain(cut.into_iter().map(|id| (id, -1.0)))
                    .collect();

                spec.add_constraint(LinearConstraint::new(
                    format!("flow_{}_{}", fabric.id, period),
                    ConstraintFamily::FlowPrecedence,
                    terms,
                    Sense::LessOrEqual,
                    0.0,
                ));
            }
        }
    }
}

/// 截至該週（含）某階段某布料的所有變數
fn cumulative_vars(spec: &ModelSpec, stage: Stage, fabric_id: &str, through: Period) -> Vec<VarId> {
    spec.select(|k| k.stage == stage && k.fabric_id == fabric_id && k.period <= through)
}

fn unit_terms(vars: Vec<VarId>) -> Vec<(VarId, f64)> {
    vars.into_iter().map(|id| (id, 1.0)).collect()
}
