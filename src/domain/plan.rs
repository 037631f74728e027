// ==========================================
// 备件补货计划系统 - 补货计划领域模型
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 6. Replenishment Planner
// 红线: 计划产物创建后不可变,下次运行整体重建
// ==========================================

use crate::domain::types::ScenarioKind;
use serde::{Deserialize, Serialize};

// ==========================================
// PlannedOrder - 计划订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedOrder {
    pub release_period: i32, // 下达期（不早于当前期）
    pub arrival_period: i32, // 到货期（取 需求期 与 下达期+提前期 的较晚者）
    pub quantity: f64,       // 订货量
    pub expedited: bool,     // 应在过去下达,已钳至当前期（加急信号）
    pub risk_adjusted: bool, // 提前期经可靠性风险调整
}

// ==========================================
// PeriodProjection - 单期净需求记录
// ==========================================
// 净需求恒等式: projected_on_hand[t] =
//   projected_on_hand[t-1] + incoming_supply[t] - gross_requirement[t]
// incoming_supply 含当期到达的计划订单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodProjection {
    pub period: i32,              // 期索引
    pub gross_requirement: f64,   // 毛需求（情景系数作用后）
    pub incoming_supply: f64,     // 当期供给（在途 + 计划到货）
    pub projected_available: f64, // 订单注入前投影可用量（触发判定口径）
    pub projected_on_hand: f64,   // 期末投影库存（带符号,负值=缺口深度）
    pub on_hand_clamped: f64,     // 对外口径: 钳零后的期末库存
    pub shortfall: f64,           // 缺口数量（与钳零口径配套单独上报）
}

// ==========================================
// ReplenishmentPlan - 时相补货计划
// ==========================================
// 同一净需求算法在不同情景系数下独立运行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPlan {
    pub scenario: ScenarioKind,           // 计划情景
    pub lead_time_periods: i32,           // 本情景下取整后的提前期
    pub periods: Vec<PeriodProjection>,   // 逐期投影轨迹
    pub planned_orders: Vec<PlannedOrder>, // 计划订单（按下达期升序）
    pub truncated: bool,                  // 预测短于计划水平,计划被截断
}

impl ReplenishmentPlan {
    /// 计划订单总量
    pub fn total_planned_qty(&self) -> f64 {
        self.planned_orders.iter().map(|o| o.quantity).sum()
    }

    /// 是否存在缺货期（带符号口径）
    pub fn has_projected_stockout(&self) -> bool {
        self.periods.iter().any(|p| p.projected_on_hand < 0.0)
    }
}
