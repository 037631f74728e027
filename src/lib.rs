// ==========================================
// 备件补货计划系统 - 核心库
// ==========================================
// 依据: Spare_Parts_Master_Spec.md - 系统宪法
// 系统定位: 计划引擎（需求预测与展示层为外部协作方）
// 红线: 引擎无 I/O、无持久化;计划产物每次运行整体重建
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 计划业务规则
pub mod engine;

// 配置层 - 阈值与系数
pub mod config;

// 批量执行层 - 并行分发与合并
pub mod batch;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AbcClass, AbcXyzTag, AlertKind, AlertSeverity, DemandPattern, PolicyFamily, ScenarioKind,
    XyzClass,
};

// 领域实体
pub use domain::{
    Alert, DemandHistory, ForecastPoint, ForecastSeries, OpenReceipt, PeriodProjection,
    PlannedOrder, PlanningUnit, PolicyParameters, ReplenishmentPlan, SkuLocationKey,
    SkuMasterData, StockingPolicy,
};

// 引擎
pub use engine::{
    AlertEngine, DemandClassifier, DynamicPolicyEngine, EngineError, PlanningOrchestrator,
    PolicySelector, ProcurementScheduler, ReplenishmentPlanner, SkuPlanResult, StockCalculator,
};

// 配置与批量
pub use batch::{BatchRunner, PlanningBatchResult, UnitFailure};
pub use config::PlanningConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "备件补货计划系统";

// ==========================================
// 预编译检查
// ==========================================
