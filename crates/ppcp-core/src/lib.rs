//! # PPCP Core
//!
//! 週生產計劃（裁剪 → 縫製）的核心資料模型與類型定義

pub mod calendar;
pub mod config;
pub mod demand;
pub mod plan;

// Re-export 主要類型
pub use calendar::{Period, PlanningHorizon};
pub use config::{CapacityOverride, FabricConfig, PlanningConfig, Resource};
pub use demand::{FabricType, PlanRequest};
pub use plan::{
    AggregatedRecord, Assignment, PeriodTotal, PlanRecord, Shift, SolveStatus, Solution, Stage,
    VariableKey,
};

/// 生產計劃錯誤類型
///
/// 只涵蓋配置類錯誤；求解結果（不可行、無界等）以 [`SolveStatus`] 表示，不是錯誤。
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("{stage} 階段找不到資源: {resource_id}")]
    UnknownResource { stage: Stage, resource_id: String },

    #[error("資源 {resource_id} 不能加工布料 {fabric_id}")]
    DisallowedFabric {
        resource_id: String,
        fabric_id: String,
    },

    #[error("找不到布料類型: {0}")]
    UnknownFabric(String),

    #[error("資源 {resource_id} 產能無效: 正常 {capacity_normal}, 含加班 {capacity_extra}")]
    InvalidCapacity {
        resource_id: String,
        capacity_normal: u32,
        capacity_extra: u32,
    },

    #[error("布料 {fabric_id} 的到貨計劃無效: {reason}")]
    InvalidDeliverySchedule { fabric_id: String, reason: String },

    #[error("{stage} 階段的資源 {resource_id} 重複覆寫")]
    DuplicateOverride { stage: Stage, resource_id: String },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
