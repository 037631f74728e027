// ==========================================
// 备件补货计划系统 - 采购时点引擎
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 5. Procurement Scheduler
// 红线: 幂等,同态输入必得同一订单;在途已覆盖缺口则不重复下单
// ==========================================
// 职责: 判定下一笔采购订单的时点与数量
// 输入: 在库/在途 + 策略参数 + 风险调整提前期
// 输出: Option<PlannedOrder>
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::forecast::ForecastSeries;
use crate::domain::plan::PlannedOrder;
use crate::domain::policy::PolicyParameters;
use crate::domain::sku::SkuMasterData;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, instrument};

// ==========================================
// 风险调整提前期
// ==========================================

/// 可靠性评分 → 风险系数（钳为 >= 0）
///
/// 评分 1.0 = 完全可靠 → 无调整;评分越低风险系数越高
pub fn risk_factor(reliability_score: f64) -> f64 {
    (1.0 - reliability_score).max(0.0)
}

/// 风险调整提前期,向上取整为整期
///
/// μ_L_adj = μ_L · (1 + 风险系数) · 情景系数
///
/// # 失败
/// - μ_L <= 0 → NegativeOrZeroLeadTime（风险调整公式无定义）
pub fn risk_adjusted_lead_periods(
    lead_time_mean: f64,
    reliability_score: f64,
    scenario_lead_multiplier: f64,
) -> EngineResult<i32> {
    if lead_time_mean <= 0.0 {
        return Err(EngineError::NegativeOrZeroLeadTime {
            lead_time_mean,
        });
    }
    let adjusted =
        lead_time_mean * (1.0 + risk_factor(reliability_score)) * scenario_lead_multiplier;
    Ok(adjusted.ceil().max(1.0) as i32)
}

// ==========================================
// ProcurementScheduler - 采购时点引擎
// ==========================================
pub struct ProcurementScheduler {
    // 无状态引擎
}

impl ProcurementScheduler {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定是否需要立即下单
    ///
    /// 算法: 投影风险调整提前期窗口末的可用量
    ///   = 在库 + 窗口内到货 - 窗口内预测需求
    /// 低于等于触发阈值（R 或 s）→ 立即下达一笔订单,
    /// 到货期 = 当前期 + 风险调整提前期
    ///
    /// 纯函数: 重复调用同一状态只会得到同一笔订单,不会翻倍;
    /// 窗口内在途直接抬高投影可用量,天然抑制重复下单
    #[instrument(skip_all, fields(now = now, on_hand = master.on_hand))]
    pub fn next_order(
        &self,
        master: &SkuMasterData,
        parameters: &PolicyParameters,
        forecast: &ForecastSeries,
        now: i32,
        config: &PlanningConfig,
    ) -> EngineResult<Option<PlannedOrder>> {
        let window =
            risk_adjusted_lead_periods(master.lead_time_mean, master.reliability_score, 1.0)?;
        let adjusted = risk_factor(master.reliability_score) > 0.0;

        // 窗口内到货（到货期落在 [now, now+window) 的在途）
        let receipts_within: f64 = master
            .open_receipts
            .iter()
            .filter(|r| r.arrival_period >= now && r.arrival_period < now + window)
            .map(|r| r.quantity)
            .sum();

        // 窗口内预测需求（预测短于窗口时按可得期数计）
        let demand_within: f64 = (0..window as usize)
            .filter_map(|offset| forecast.mean_at_offset(offset))
            .sum();

        let projected_available = master.on_hand + receipts_within - demand_within;
        let threshold = parameters.reorder_threshold();

        if projected_available > threshold {
            debug!(
                projected_available,
                threshold, "投影可用量高于触发阈值,无需下单"
            );
            return Ok(None);
        }

        let quantity = config.round_qty(
            parameters
                .order_quantity(projected_available)
                .max(master.moq())
                .max(1.0),
        );

        debug!(
            projected_available,
            threshold, quantity, window, "触发采购订单"
        );

        Ok(Some(PlannedOrder {
            release_period: now,
            arrival_period: now + window,
            quantity,
            expedited: false,
            risk_adjusted: adjusted,
        }))
    }
}

impl Default for ProcurementScheduler {
    fn default() -> Self {
        Self::new()
    }
}
