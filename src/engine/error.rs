// ==========================================
// 备件补货计划系统 - 引擎层错误类型
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 9. 错误处理设计
// 工具: thiserror 派生宏
// ==========================================
// 红线: 单元级失败隔离,不中止批次;数据有效性错误不自动重试
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 分类器错误 =====
    // 调用方收到后回退到保守模式(LUMPY),不阻断计划
    #[error("历史数据不足: 提供 {supplied} 期,至少需要 {required} 期")]
    InsufficientHistory { supplied: usize, required: usize },

    // ===== 库存计算错误 =====
    // EOQ/安全库存公式在此类输入下无定义,该单元计划跳过并上报
    #[error("成本参数无效: {reason}")]
    InvalidCostParameters { reason: String },

    #[error("提前期均值非正: {lead_time_mean}（风险调整公式无定义）")]
    NegativeOrZeroLeadTime { lead_time_mean: f64 },

    // ===== 预测输入错误 =====
    #[error("预测序列缺失: 提供 {supplied} 期,计划水平 {horizon} 期")]
    MissingForecast { supplied: usize, horizon: usize },

    #[error("预测序列无效: {reason}")]
    InvalidForecast { reason: String },

    // ===== 主数据错误 =====
    #[error("主数据无效 (field={field}): {reason}")]
    InvalidMasterData { field: String, reason: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// 错误类别代码（批量结果序列化口径）
    pub fn kind_code(&self) -> &'static str {
        match self {
            EngineError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            EngineError::InvalidCostParameters { .. } => "INVALID_COST_PARAMETERS",
            EngineError::NegativeOrZeroLeadTime { .. } => "NEGATIVE_OR_ZERO_LEAD_TIME",
            EngineError::MissingForecast { .. } => "MISSING_FORECAST",
            EngineError::InvalidForecast { .. } => "INVALID_FORECAST",
            EngineError::InvalidMasterData { .. } => "INVALID_MASTER_DATA",
            EngineError::Other(_) => "INTERNAL",
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
