//! 隨機小型情境的性質測試：最佳解必須通過計劃驗證

use chrono::NaiveDate;
use ppcp_calc::{PlanVerifier, ResultAggregator};
use ppcp_core::{
    FabricConfig, PlanRequest, PlanningConfig, PlanningHorizon, Resource, SolveStatus, Stage,
};
use ppcp_optimizer::ProductionPlanner;
use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const FABRICS: [&str; 2] = ["Tecido Plano", "Malharia"];

#[derive(Debug, Clone)]
struct Scenario {
    weeks: u32,
    schedules: Vec<Vec<u32>>,
    demand: Vec<u32>,
    cut: Vec<(u32, u32)>,
    sew: Vec<(u32, u32)>,
}

/// 到貨百分比：前 n-1 週隨機，最後一週補足 100
fn schedule(weeks: u32) -> impl Strategy<Value = Vec<u32>> {
    let cap = 100 / weeks;
    prop::collection::vec(0..=cap, (weeks - 1) as usize).prop_map(|mut head| {
        let used: u32 = head.iter().sum();
        head.push(100 - used);
        head
    })
}

fn capacity() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=120, 0u32..=60).prop_map(|(normal, overtime)| (normal, normal + overtime))
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (1u32..=3).prop_flat_map(|weeks| {
        (
            Just(weeks),
            prop::collection::vec(schedule(weeks), FABRICS.len()),
            prop::collection::vec(0u32..=250, FABRICS.len()),
            prop::collection::vec(capacity(), 2),
            prop::collection::vec(capacity(), 2),
        )
            .prop_map(|(weeks, schedules, demand, cut, sew)| Scenario {
                weeks,
                schedules,
                demand,
                cut,
                sew,
            })
    })
}

/// 第一個資源只做平織布，第二個資源兩種都能做
fn build(scenario: &Scenario) -> (PlanningConfig, PlanRequest) {
    let start = NaiveDate::from_ymd_opt(2025, 9, 9).unwrap();
    let mut config = PlanningConfig::new(PlanningHorizon::new(start, scenario.weeks));

    for (fabric, percents) in FABRICS.iter().zip(&scenario.schedules) {
        config = config.with_fabric(FabricConfig::new(
            fabric.to_string(),
            percents.iter().map(|p| Decimal::new(i64::from(*p), 2)).collect(),
        ));
    }

    for (stage, capacities) in [(Stage::Cut, &scenario.cut), (Stage::Sew, &scenario.sew)] {
        for (index, &(normal, extra)) in capacities.iter().enumerate() {
            let fabric_types = if index == 0 {
                vec![FABRICS[0].to_string()]
            } else {
                FABRICS.iter().map(|f| f.to_string()).collect()
            };
            config = config.with_resource(
                stage,
                Resource::new(format!("{}-{}", stage, index + 1), fabric_types, normal, extra),
            );
        }
    }

    let demand = FABRICS
        .iter()
        .map(|f| f.to_string())
        .zip(scenario.demand.iter().copied())
        .collect::<BTreeMap<_, _>>();

    (config, PlanRequest::new(demand))
}

#[test]
fn fractional_availability_solves_quickly() {
    // 第 1 週可用量 91 × 0.09 = 8.19 件
    let scenario = Scenario {
        weeks: 3,
        schedules: vec![vec![9, 9, 82], vec![12, 14, 74]],
        demand: vec![91, 99],
        cut: vec![(39, 97), (95, 107)],
        sew: vec![(105, 113), (98, 105)],
    };
    let (config, request) = build(&scenario);
    let planner = ProductionPlanner::new(config.clone()).unwrap();

    let start = Instant::now();
    let response = planner.plan(&request).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status, SolveStatus::Optimal);
    assert!((response.objective_value.unwrap() - 39500.0).abs() < 1e-6);
    assert!(elapsed < Duration::from_secs(5), "solve took {:?}", elapsed);

    let fabrics = request.resolve_fabrics(&config).unwrap();
    assert!(PlanVerifier::verify(&config, &fabrics, &response.records).is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn optimal_plans_satisfy_every_constraint(scenario in scenario()) {
        let (config, request) = build(&scenario);
        let planner = ProductionPlanner::new(config.clone()).unwrap();
        let response = planner.plan(&request).unwrap();

        match response.status {
            SolveStatus::Optimal => {
                let fabrics = request.resolve_fabrics(&config).unwrap();
                let violations = PlanVerifier::verify(&config, &fabrics, &response.records);
                prop_assert!(violations.is_empty(), "{:?}", violations);

                let cost = ResultAggregator::total_cost(&response.records);
                let objective = response.objective_value.unwrap();
                prop_assert!((objective - cost.to_f64().unwrap()).abs() < 1e-3);
            }
            _ => {
                prop_assert!(response.records.is_empty());
                prop_assert!(response.objective_value.is_none());
            }
        }
    }

    #[test]
    fn request_never_changes_base(scenario in scenario()) {
        let (config, request) = build(&scenario);
        let planner = ProductionPlanner::new(config.clone()).unwrap();
        planner.plan(&request).unwrap();

        prop_assert_eq!(planner.base_config(), &config);
    }
}
