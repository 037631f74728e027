// ==========================================
// 备件补货计划系统 - 配置层
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 10. 配置项全集
// ==========================================
// 职责: 阈值与系数管理,运行期只读
// ==========================================

pub mod planning_config;

pub use planning_config::{ConfigError, PlanningConfig};
