//! # PPCP Calculation
//!
//! 原料可用量計算、結果彙總與計劃驗證

pub mod aggregation;
pub mod availability;
pub mod verification;

// Re-export 主要類型
pub use aggregation::{ResultAggregator, ZERO_TOLERANCE};
pub use availability::{AvailabilityCalculator, AvailabilityPoint};
pub use verification::PlanVerifier;

use serde::{Deserialize, Serialize};

/// 計劃警告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// 相關的布料或資源ID
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    /// 配置提示，不影響計劃成立
    Warning,
    /// 計劃違反限制
    Error,
}
