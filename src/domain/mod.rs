// ==========================================
// 备件补货计划系统 - 领域层
// ==========================================
// 依据: Spare_Parts_Master_Spec.md - PART C 数据与状态体系
// ==========================================
// 职责: 实体与类型定义,不含业务规则
// ==========================================

pub mod alert;
pub mod forecast;
pub mod plan;
pub mod policy;
pub mod sku;
pub mod types;

// 重导出核心实体
pub use alert::Alert;
pub use forecast::{ForecastPoint, ForecastSeries};
pub use plan::{PeriodProjection, PlannedOrder, ReplenishmentPlan};
pub use policy::{DerivationSnapshot, PolicyParameters, StockingPolicy};
pub use sku::{DemandHistory, OpenReceipt, PlanningUnit, SkuLocationKey, SkuMasterData};
