// ==========================================
// 备件补货计划系统 - 安全库存/EOQ 计算引擎
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 3. Stock Calculator
// 红线: 纯数值函数,无副作用;退化输入显式报错,不输出 NaN/∞
// ==========================================
// 职责: 安全库存、再订货点、经济订货批量
// 输入: 预测均值/标准差 + 提前期分布 + 服务水平 + 成本参数
// 输出: DerivationSnapshot
// ==========================================

use crate::domain::policy::DerivationSnapshot;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// StockCalcInputs - 计算输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCalcInputs {
    pub mean_demand: f64,      // μ_d: 单期预测需求均值
    pub std_demand: f64,       // σ_d: 单期预测需求标准差
    pub lead_time_mean: f64,   // μ_L: 提前期均值（期）
    pub lead_time_std: f64,    // σ_L: 提前期标准差（期）
    pub service_level: f64,    // 目标服务水平 (0,1)
    pub unit_cost: f64,        // 单位成本
    pub holding_rate: f64,     // 持有成本率（单位成本比例/期）
    pub ordering_cost: f64,    // 固定订货成本
    pub periods_per_year: f64, // 年化系数
}

// ==========================================
// StockCalculator - 安全库存/EOQ 计算引擎
// ==========================================
pub struct StockCalculator {
    // 无状态引擎
}

impl StockCalculator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算安全库存、再订货点与 EOQ
    ///
    /// 公式:
    /// - SS  = z · sqrt(μ_L·σ_d² + μ_d²·σ_L²)   （复合方差,σ_L=0 时该项精确为 0）
    /// - ROP = μ_d·μ_L + SS
    /// - EOQ = sqrt(2·D_年·订货成本 / (单位成本·持有率))
    ///
    /// # 失败
    /// - μ_L <= 0 → NegativeOrZeroLeadTime
    /// - 单位成本 <= 0 / 持有率 <= 0 / 订货成本 < 0 → InvalidCostParameters
    /// - σ_d < 0、服务水平越界 → InvalidMasterData
    ///
    /// EOQ 在 D_年 = 0 或订货成本 = 0 时不可定,返回 None 哨兵,
    /// 强制调用方显式处理,绝不输出 NaN/∞
    #[instrument(skip(self, inputs), fields(
        mean_demand = inputs.mean_demand,
        lead_time_mean = inputs.lead_time_mean,
        service_level = inputs.service_level
    ))]
    pub fn compute(&self, inputs: &StockCalcInputs) -> EngineResult<DerivationSnapshot> {
        if inputs.lead_time_mean <= 0.0 {
            return Err(EngineError::NegativeOrZeroLeadTime {
                lead_time_mean: inputs.lead_time_mean,
            });
        }
        if inputs.lead_time_std < 0.0 {
            return Err(EngineError::InvalidMasterData {
                field: "lead_time_std".to_string(),
                reason: format!("提前期标准差不可为负: {}", inputs.lead_time_std),
            });
        }
        if inputs.std_demand < 0.0 {
            return Err(EngineError::InvalidMasterData {
                field: "std_demand".to_string(),
                reason: format!("需求标准差不可为负: {}", inputs.std_demand),
            });
        }
        if !(inputs.service_level > 0.0 && inputs.service_level < 1.0) {
            return Err(EngineError::InvalidMasterData {
                field: "service_level".to_string(),
                reason: format!("服务水平必须位于(0,1): {}", inputs.service_level),
            });
        }
        if inputs.unit_cost <= 0.0 || inputs.holding_rate <= 0.0 || inputs.ordering_cost < 0.0 {
            return Err(EngineError::InvalidCostParameters {
                reason: format!(
                    "unit_cost={}, holding_rate={}, ordering_cost={}（EOQ 公式无定义）",
                    inputs.unit_cost, inputs.holding_rate, inputs.ordering_cost
                ),
            });
        }

        let mean_demand = inputs.mean_demand.max(0.0);
        let z = inverse_normal_cdf(inputs.service_level);

        // 复合方差: 需求在提前期内的方差 + 提前期自身方差
        let compound_var = inputs.lead_time_mean * inputs.std_demand * inputs.std_demand
            + mean_demand * mean_demand * inputs.lead_time_std * inputs.lead_time_std;
        let safety_stock = (z * compound_var.sqrt()).max(0.0);

        let reorder_point = mean_demand * inputs.lead_time_mean + safety_stock;

        let annual_demand = mean_demand * inputs.periods_per_year;
        let eoq = if annual_demand <= 0.0 || inputs.ordering_cost == 0.0 {
            // 不可定哨兵: 无需求或零订货成本下 EOQ 退化
            None
        } else {
            Some(
                (2.0 * annual_demand * inputs.ordering_cost
                    / (inputs.unit_cost * inputs.holding_rate))
                    .sqrt(),
            )
        };

        Ok(DerivationSnapshot {
            z_score: z,
            safety_stock,
            reorder_point,
            eoq,
            annual_demand,
        })
    }
}

impl Default for StockCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 标准正态分布逆 CDF（分位函数）
// ==========================================

/// Abramowitz-Stegun 26.2.23 有理逼近,绝对误差 < 4.5e-4
///
/// 服务水平 → z 分位;p<=0 / p>=1 钳在 ±5σ
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p >= 1.0 {
        return 5.0;
    }
    if p <= 0.0 {
        return -5.0;
    }
    if p == 0.5 {
        return 0.0;
    }

    // 公式适用于 0 < q <= 0.5;p > 0.5 时用对称性取负
    let q = if p < 0.5 { p } else { 1.0 - p };

    let t = (-2.0 * q.ln()).sqrt();

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;

    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let numerator = c0 + c1 * t + c2 * t * t;
    let denominator = 1.0 + d1 * t + d2 * t * t + d3 * t * t * t;

    let x = t - numerator / denominator;

    if p < 0.5 {
        -x
    } else {
        x
    }
}

/// 金额口径: 两位小数
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
