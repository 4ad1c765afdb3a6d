//! 計劃驗證：對求解後的記錄重新檢查四類限制

use ppcp_core::{FabricType, PlanRecord, PlanningConfig, Shift, Stage};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::availability::AvailabilityCalculator;
use crate::PlanWarning;

/// 計劃驗證器
pub struct PlanVerifier;

impl PlanVerifier {
    /// 檢查計劃是否滿足需求、班別產能、原料可用量與流程先後
    ///
    /// 回傳所有違反項目；空列表表示計劃成立。
    pub fn verify(
        config: &PlanningConfig,
        fabrics: &[FabricType],
        records: &[PlanRecord],
    ) -> Vec<PlanWarning> {
        let mut violations = Vec::new();

        Self::check_capability(config, records, &mut violations);
        Self::check_demand(fabrics, records, &mut violations);
        Self::check_shift_capacity(config, records, &mut violations);
        Self::check_material_flow(config, fabrics, records, &mut violations);

        if !violations.is_empty() {
            tracing::warn!("計劃驗證發現 {} 項違反", violations.len());
        }

        violations
    }

    /// 配置層面的提示（不阻止求解）
    pub fn configuration_warnings(
        config: &PlanningConfig,
        fabrics: &[FabricType],
    ) -> Vec<PlanWarning> {
        let mut warnings = Vec::new();

        for fabric in fabrics.iter().filter(|f| f.has_demand()) {
            let total: Decimal = fabric.delivery_schedule.iter().sum();
            if total < Decimal::ONE {
                warnings.push(PlanWarning::warning(
                    fabric.id.clone(),
                    format!("到貨比例合計只有 {}，無法全數到貨", total),
                ));
            }

            for stage in Stage::ALL {
                if !config
                    .resources(stage)
                    .iter()
                    .any(|r| r.can_process(&fabric.id))
                {
                    warnings.push(PlanWarning::warning(
                        fabric.id.clone(),
                        format!("{} 階段沒有可加工此布料的資源", stage),
                    ));
                }
            }
        }

        warnings
    }

    /// 某階段某布料的總產量
    pub fn stage_total(records: &[PlanRecord], stage: Stage, fabric_id: &str) -> u64 {
        records
            .iter()
            .filter(|r| r.stage == stage && r.fabric_id == fabric_id)
            .map(|r| r.quantity)
            .sum()
    }

    fn check_capability(
        config: &PlanningConfig,
        records: &[PlanRecord],
        violations: &mut Vec<PlanWarning>,
    ) {
        for record in records {
            let capable = config
                .resource(record.stage, &record.resource_id)
                .is_some_and(|r| r.can_process(&record.fabric_id));
            if !capable {
                violations.push(PlanWarning::error(
                    record.resource_id.clone(),
                    format!("{} 階段不能加工 {}", record.stage, record.fabric_id),
                ));
            }
        }
    }

    fn check_demand(
        fabrics: &[FabricType],
        records: &[PlanRecord],
        violations: &mut Vec<PlanWarning>,
    ) {
        for fabric in fabrics {
            let sewn = Self::stage_total(records, Stage::Sew, &fabric.id);
            if sewn < u64::from(fabric.demand_qty) {
                violations.push(PlanWarning::error(
                    fabric.id.clone(),
                    format!("縫製 {} 件，未達需求 {} 件", sewn, fabric.demand_qty),
                ));
            }
        }
    }

    fn check_shift_capacity(
        config: &PlanningConfig,
        records: &[PlanRecord],
        violations: &mut Vec<PlanWarning>,
    ) {
        let mut load: HashMap<(Stage, u32, &str, Shift), u64> = HashMap::new();
        for record in records {
            *load
                .entry((
                    record.stage,
                    record.period.number(),
                    record.resource_id.as_str(),
                    record.shift,
                ))
                .or_insert(0) += record.quantity;
        }

        for ((stage, period, resource_id, shift), quantity) in load {
            let Some(resource) = config.resource(stage, resource_id) else {
                continue;
            };
            let limit = u64::from(resource.shift_capacity(shift));
            if quantity > limit {
                violations.push(PlanWarning::error(
                    resource_id.to_string(),
                    format!(
                        "第 {} 週 {} 班產量 {} 超過上限 {}",
                        period, shift, quantity, limit
                    ),
                ));
            }
        }
    }

    fn check_material_flow(
        config: &PlanningConfig,
        fabrics: &[FabricType],
        records: &[PlanRecord],
        violations: &mut Vec<PlanWarning>,
    ) {
        for fabric in fabrics {
            let availability = AvailabilityCalculator::cumulative(fabric, &config.horizon);
            let mut cut_so_far = 0u64;
            let mut sewn_so_far = 0u64;

            for point in availability {
                let in_period = |stage: Stage| -> u64 {
                    records
                        .iter()
                        .filter(|r| {
                            r.stage == stage && r.period == point.period && r.fabric_id == fabric.id
                        })
                        .map(|r| r.quantity)
                        .sum()
                };
                cut_so_far += in_period(Stage::Cut);
                sewn_so_far += in_period(Stage::Sew);

                if Decimal::from(cut_so_far) > point.available_qty {
                    violations.push(PlanWarning::error(
                        fabric.id.clone(),
                        format!(
                            "截至 {} 累計裁剪 {} 件，超過可用原料 {}",
                            point.period, cut_so_far, point.available_qty
                        ),
                    ));
                }
                if sewn_so_far > cut_so_far {
                    violations.push(PlanWarning::error(
                        fabric.id.clone(),
                        format!(
                            "截至 {} 累計縫製 {} 件，超過累計裁剪 {} 件",
                            point.period, sewn_so_far, cut_so_far
                        ),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WarningSeverity;
    use chrono::NaiveDate;
    use ppcp_core::{FabricConfig, Period, PlanningHorizon, Resource};

    fn config() -> PlanningConfig {
        PlanningConfig::new(PlanningHorizon::new(
            NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(),
            2,
        ))
        .with_fabric(FabricConfig::new(
            "Malharia".to_string(),
            vec![Decimal::new(2, 1), Decimal::new(8, 1)],
        ))
        .with_resource(
            Stage::Cut,
            Resource::new("CUT".to_string(), vec!["Malharia".to_string()], 100, 120),
        )
        .with_resource(
            Stage::Sew,
            Resource::new("SEW".to_string(), vec!["Malharia".to_string()], 100, 120),
        )
    }

    fn fabrics(demand: u32) -> Vec<FabricType> {
        vec![FabricType::from_config(&config().fabrics[0], demand)]
    }

    fn record(stage: Stage, period: u32, shift: Shift, quantity: u64) -> PlanRecord {
        PlanRecord {
            stage,
            period: Period::new(period).unwrap(),
            week_start: NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(),
            resource_id: if stage == Stage::Cut { "CUT" } else { "SEW" }.to_string(),
            fabric_id: "Malharia".to_string(),
            shift,
            quantity,
            cost_weight: Decimal::from(100),
        }
    }

    #[test]
    fn test_valid_plan() {
        let records = vec![
            record(Stage::Cut, 1, Shift::Normal, 10),
            record(Stage::Sew, 1, Shift::Normal, 10),
            record(Stage::Cut, 2, Shift::Normal, 40),
            record(Stage::Sew, 2, Shift::Normal, 40),
        ];

        assert!(PlanVerifier::verify(&config(), &fabrics(50), &records).is_empty());
        assert_eq!(PlanVerifier::stage_total(&records, Stage::Sew, "Malharia"), 50);
    }

    #[test]
    fn test_detects_each_violation() {
        let records = vec![
            // 超過第 1 週可用量 10，且縫製多於裁剪
            record(Stage::Cut, 1, Shift::Normal, 15),
            record(Stage::Sew, 1, Shift::Normal, 18),
            // 加班上限為 20
            record(Stage::Cut, 2, Shift::Extra, 25),
        ];

        let violations = PlanVerifier::verify(&config(), &fabrics(50), &records);
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();

        assert!(violations.iter().all(|v| v.severity == WarningSeverity::Error));
        assert!(messages.iter().any(|m| m.contains("未達需求")));
        assert!(messages.iter().any(|m| m.contains("超過上限")));
        assert!(messages.iter().any(|m| m.contains("超過可用原料")));
        assert!(messages.iter().any(|m| m.contains("超過累計裁剪")));
    }

    #[test]
    fn test_detects_incapable_resource() {
        let mut bad = record(Stage::Cut, 1, Shift::Normal, 5);
        bad.resource_id = "SEW".to_string();

        let violations = PlanVerifier::verify(&config(), &fabrics(0), &[bad]);
        assert!(violations.iter().any(|v| v.subject == "SEW"));
    }

    #[test]
    fn test_configuration_warnings() {
        let mut cfg = config();
        cfg.fabrics[0].delivery_schedule = vec![Decimal::new(2, 1), Decimal::new(3, 1)];
        cfg.sew_resources.clear();
        let fabrics = vec![FabricType::from_config(&cfg.fabrics[0], 10)];

        let warnings = PlanVerifier::configuration_warnings(&cfg, &fabrics);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.severity == WarningSeverity::Warning));

        let idle = vec![FabricType::from_config(&cfg.fabrics[0], 0)];
        assert!(PlanVerifier::configuration_warnings(&cfg, &idle).is_empty());
    }
}
