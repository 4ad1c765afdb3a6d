//! 生產計劃請求處理：建模 → 求解 → 彙總

use ppcp_calc::{PlanVerifier, ResultAggregator};
use ppcp_core::{PlanRequest, PlanningConfig};
use std::sync::Arc;

use crate::builder::ModelBuilder;
use crate::solver::{GoodLpSolver, PlanSolver};
use crate::PlanResponse;

/// 生產計劃器
///
/// 持有不可變的基礎配置；每次請求在私有副本上套用覆寫，可在多個執行緒間共用。
pub struct ProductionPlanner {
    base: PlanningConfig,
    solver: Arc<dyn PlanSolver>,
}

impl ProductionPlanner {
    /// 創建計劃器（驗證基礎配置，預設使用 good_lp 後端）
    pub fn new(base: PlanningConfig) -> ppcp_core::Result<Self> {
        base.validate()?;
        Ok(Self {
            base,
            solver: Arc::new(GoodLpSolver::new()),
        })
    }

    /// 建構器模式：替換求解後端
    pub fn with_solver(mut self, solver: impl PlanSolver + 'static) -> Self {
        self.solver = Arc::new(solver);
        self
    }

    /// 基礎配置
    pub fn base_config(&self) -> &PlanningConfig {
        &self.base
    }

    /// 處理一次求解請求
    ///
    /// 配置錯誤在求解前回傳 `Err`；求解結果（含不可行）一律以 `Ok(PlanResponse)` 回傳。
    pub fn plan(&self, request: &PlanRequest) -> ppcp_core::Result<PlanResponse> {
        let span = tracing::info_span!("plan", request_id = %request.id);
        let _guard = span.enter();

        let start_time = std::time::Instant::now();
        tracing::info!(
            "開始生產計劃求解：布料需求 {} 筆，覆寫 {} 筆，後端 {}",
            request.demand.len(),
            request.cut_overrides.len() + request.sew_overrides.len(),
            self.solver.name()
        );

        let builder = ModelBuilder::from_request(&self.base, request)?;
        let scenario = builder.scenario();
        let fabrics = builder.fabrics();

        let mut warnings = PlanVerifier::configuration_warnings(scenario, fabrics);
        for warning in &warnings {
            tracing::warn!("{}: {}", warning.subject, warning.message);
        }

        let spec = builder.build();
        tracing::info!(
            "模型: 變數 {} 個，限制 {} 條",
            spec.variables().len(),
            spec.constraints().len()
        );

        let solution = self.solver.solve(&spec);
        let records = ResultAggregator::records(&solution, &scenario.horizon);

        if solution.is_optimal() {
            warnings.extend(PlanVerifier::verify(scenario, fabrics, &records));
        } else {
            tracing::warn!("求解未得到最佳解，狀態: {}", solution.status);
        }

        let response = PlanResponse {
            request_id: request.id,
            status: solution.status,
            objective_value: solution.objective_value,
            aggregated: ResultAggregator::aggregate(&records),
            period_totals: ResultAggregator::period_totals(&records),
            records,
            warnings,
            solve_time_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "生產計劃完成，狀態 {}，目標值 {:?}，記錄 {} 筆，耗時 {:?}",
            response.status,
            response.objective_value,
            response.records.len(),
            start_time.elapsed()
        );

        Ok(response)
    }
}
