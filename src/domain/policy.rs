// ==========================================
// 备件补货计划系统 - 库存策略领域模型
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 4. Policy Engine
// 红线: 策略参数单次运行内不可变,下次运行整体重算
// ==========================================

use crate::domain::types::PolicyFamily;
use serde::{Deserialize, Serialize};

// ==========================================
// PolicyParameters - 策略参数（按策略族变体）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyParameters {
    /// 连续盘点 (Q,R): 库存位置降至 R 即下固定批量 Q
    ContinuousReview {
        order_qty: f64,     // Q: 订货批量
        reorder_point: f64, // R: 再订货点
    },
    /// 定期盘点 (s,S): 每 T 期盘点,低于 s 则补至 S
    PeriodicReview {
        reorder_floor: f64, // s: 再订货下限
        order_up_to: f64,   // S: 补货目标位
        review_period: i32, // T: 盘点间隔（期）
    },
}

impl PolicyParameters {
    /// 所属策略族
    pub fn family(&self) -> PolicyFamily {
        match self {
            PolicyParameters::ContinuousReview { .. } => PolicyFamily::ContinuousReview,
            PolicyParameters::PeriodicReview { .. } => PolicyFamily::PeriodicReview,
        }
    }

    /// 再订货触发阈值（R 或 s）
    pub fn reorder_threshold(&self) -> f64 {
        match self {
            PolicyParameters::ContinuousReview { reorder_point, .. } => *reorder_point,
            PolicyParameters::PeriodicReview { reorder_floor, .. } => *reorder_floor,
        }
    }

    /// 触发时的订货量（连续盘点固定 Q;定期盘点补至 S）
    ///
    /// # 参数
    /// - projected_available: 触发时点的投影可用量
    pub fn order_quantity(&self, projected_available: f64) -> f64 {
        match self {
            PolicyParameters::ContinuousReview { order_qty, .. } => *order_qty,
            PolicyParameters::PeriodicReview { order_up_to, .. } => {
                (order_up_to - projected_available).max(0.0)
            }
        }
    }
}

// ==========================================
// DerivationSnapshot - 参数推导快照
// ==========================================
// 可解释性: 策略参数必须携带其计算依据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationSnapshot {
    pub z_score: f64,          // 服务水平 z 分位
    pub safety_stock: f64,     // 安全库存
    pub reorder_point: f64,    // 再订货点（μ_d·μ_L + SS）
    pub eoq: Option<f64>,      // 经济订货批量（None=不可定,需显式处理）
    pub annual_demand: f64,    // 年化需求
}

// ==========================================
// StockingPolicy - 生效策略
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockingPolicy {
    pub parameters: PolicyParameters,    // 策略参数
    pub derivation: DerivationSnapshot,  // 推导快照（可解释性）
}

impl StockingPolicy {
    pub fn family(&self) -> PolicyFamily {
        self.parameters.family()
    }
}
