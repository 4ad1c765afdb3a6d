//! 求解器介面與 good_lp 後端

use good_lp::{
    default_solver, variable, Expression, ProblemVariables, ResolutionError, SolverModel,
    Variable,
};
use good_lp::Solution as _;
use ppcp_core::{Solution, SolveStatus};
use std::panic::{self, AssertUnwindSafe};

use crate::model::{ModelSpec, Sense};

/// 後端輸出允許的限制誤差
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// 求解器介面：`ModelSpec → Solution`
///
/// 實作不得回傳錯誤或 panic 給呼叫端；任何非最佳結果都以狀態表示，且不帶取值。
pub trait PlanSolver: Send + Sync {
    /// 後端名稱（用於日誌）
    fn name(&self) -> &str;

    fn solve(&self, spec: &ModelSpec) -> Solution;
}

/// 以 good_lp（microlp 純 Rust 後端）求解整數規劃
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }

    /// 建立 good_lp 問題並求解，回傳每個變數的取值
    fn run_backend(spec: &ModelSpec) -> Result<Vec<f64>, ResolutionError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = spec
            .variables()
            .iter()
            .map(|v| {
                vars.add(
                    variable()
                        .integer()
                        .min(0.0)
                        .max(v.upper_bound)
                        .name(v.key.to_string()),
                )
            })
            .collect();

        let objective = spec
            .variables()
            .iter()
            .zip(&handles)
            .fold(Expression::from(0.0), |acc, (v, &handle)| {
                acc + v.cost_weight_f64() * handle
            });

        let mut problem = vars.minimise(objective).using(default_solver);

        for constraint in spec.constraints().iter().filter(|c| !c.terms.is_empty()) {
            let lhs = constraint
                .terms
                .iter()
                .fold(Expression::from(0.0), |acc, &(id, coef)| {
                    acc + coef * handles[id.index()]
                });
            let bound = match constraint.sense {
                Sense::LessOrEqual => lhs.leq(constraint.rhs),
                Sense::GreaterOrEqual => lhs.geq(constraint.rhs),
            };
            problem.add_constraint(bound);
        }

        let solution = problem.solve()?;
        Ok(handles.iter().map(|&h| solution.value(h)).collect())
    }
}

impl PlanSolver for GoodLpSolver {
    fn name(&self) -> &str {
        "good_lp/microlp"
    }

    fn solve(&self, spec: &ModelSpec) -> Solution {
        if let Some(constraint) = spec.trivially_infeasible() {
            tracing::warn!("限制 {} 無任何變數且無法滿足，判定不可行", constraint.name);
            return Solution::without_plan(SolveStatus::Infeasible);
        }

        if spec.variables().is_empty() {
            return Solution::optimal(0.0, Vec::new());
        }

        guarded(spec, || Self::run_backend(spec))
    }
}

/// 執行後端並把任何結果轉成 [`Solution`]
///
/// 後端 panic、或回傳違反限制的取值，都視為 `Undetermined`。
fn guarded(
    spec: &ModelSpec,
    backend: impl FnOnce() -> Result<Vec<f64>, ResolutionError>,
) -> Solution {
    match panic::catch_unwind(AssertUnwindSafe(backend)) {
        Ok(Ok(values)) => {
            let violated = spec.violated(&values, FEASIBILITY_TOLERANCE);
            if let Some(first) = violated.first() {
                tracing::warn!(
                    "後端回傳的解違反 {} 條限制（首條: {}）",
                    violated.len(),
                    first.name
                );
                return Solution::without_plan(SolveStatus::Undetermined);
            }
            Solution::optimal(spec.objective_value(&values), spec.assignments(&values))
        }
        Ok(Err(ResolutionError::Infeasible)) => Solution::without_plan(SolveStatus::Infeasible),
        Ok(Err(ResolutionError::Unbounded)) => Solution::without_plan(SolveStatus::Unbounded),
        Ok(Err(other)) => {
            tracing::warn!("求解器未能完成: {}", other);
            Solution::without_plan(SolveStatus::Undetermined)
        }
        Err(_) => {
            tracing::error!("求解器後端異常終止");
            Solution::without_plan(SolveStatus::Undetermined)
        }
    }
}
