//! # PPCP
//!
//! 紡織廠週生產計劃（裁剪 → 縫製）最佳化引擎

pub use ppcp_calc::{PlanVerifier, PlanWarning, ResultAggregator, WarningSeverity};
pub use ppcp_core::{
    AggregatedRecord, CapacityOverride, FabricConfig, PeriodTotal, PlanError, PlanRecord,
    PlanRequest, PlanningConfig, PlanningHorizon, Resource, Shift, SolveStatus, Stage,
};
pub use ppcp_optimizer::{GoodLpSolver, ModelBuilder, PlanResponse, PlanSolver, ProductionPlanner};
