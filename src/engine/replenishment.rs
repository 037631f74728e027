// ==========================================
// 备件补货计划系统 - 多期补货计划引擎 (MRP 净需求)
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 6. Replenishment Planner
// 红线: 期序严格递增折叠,本路径零随机;
//       带符号投影承载缺口深度,钳零口径仅用于对外上报
// ==========================================
// 职责: 逐期净需求 + 计划订单插入 + 投影轨迹
// 输入: 主数据 + 策略参数 + 预测序列 + 情景
// 输出: ReplenishmentPlan
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::forecast::ForecastSeries;
use crate::domain::plan::{PeriodProjection, PlannedOrder, ReplenishmentPlan};
use crate::domain::policy::PolicyParameters;
use crate::domain::sku::SkuMasterData;
use crate::domain::types::ScenarioKind;
use crate::engine::error::EngineResult;
use crate::engine::scheduler::{risk_adjusted_lead_periods, risk_factor};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

// ==========================================
// NettingState - 跨期携带状态
// ==========================================
// 每期计算 = (前态, 当期输入) → (新态, 当期输出) 的纯步函数
#[derive(Debug, Clone)]
struct NettingState {
    projected_on_hand: f64,        // 期末投影库存（带符号）
    receipts: BTreeMap<i32, f64>,  // 待到货: 期 → 数量（在途 + 已插入计划订单）
    orders: Vec<PlannedOrder>,     // 累计计划订单
}

// ==========================================
// ReplenishmentPlanner - 多期补货计划引擎
// ==========================================
pub struct ReplenishmentPlanner {
    // 无状态引擎
}

impl ReplenishmentPlanner {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成单情景时相补货计划
    ///
    /// 逐期算法:
    /// 1. 当期供给 = 在途到货 + 此前插入且当期到达的计划订单
    /// 2. 毛需求 = 预测均值 x 情景需求系数（负预测截零）
    /// 3. 投影可用 = 上期期末 + 当期供给 - 毛需求
    /// 4. 投影可用(含提前期窗口内待到货) < 触发阈值 → 插入计划订单:
    ///    下达期 = max(需求期 - 提前期, 当前期),下达期被钳则打加急标记;
    ///    到货期 = max(需求期, 下达期 + 提前期)（取较晚者,不低估缺口）
    /// 5. 期末投影 = 投影可用 + 当期到达的新订单量
    ///
    /// 预测短于计划水平 → 截断计划并打标,不报错
    #[instrument(skip_all, fields(scenario = %scenario, horizon = config.planning_horizon))]
    pub fn plan(
        &self,
        master: &SkuMasterData,
        parameters: &PolicyParameters,
        forecast: &ForecastSeries,
        scenario: ScenarioKind,
        config: &PlanningConfig,
    ) -> EngineResult<ReplenishmentPlan> {
        forecast.validate(config.planning_horizon)?;
        // validate 已拒绝空序列,此处兜底取 0
        let now = forecast.start_period().unwrap_or(0);

        let horizon = config.planning_horizon.min(forecast.len());
        let truncated = forecast.len() < config.planning_horizon;
        if truncated {
            warn!(
                supplied = forecast.len(),
                requested = config.planning_horizon,
                "预测短于计划水平,计划截断"
            );
        }

        let (demand_multiplier, lead_multiplier) = config.scenario_multipliers(scenario);
        let lead = risk_adjusted_lead_periods(
            master.lead_time_mean,
            master.reliability_score,
            lead_multiplier,
        )?;
        let risk_adjusted = risk_factor(master.reliability_score) > 0.0;
        let threshold = parameters.reorder_threshold();

        // 在途收货入池;已过期的到货并入首期供给
        let mut state = NettingState {
            projected_on_hand: master.on_hand,
            receipts: BTreeMap::new(),
            orders: Vec::new(),
        };
        for receipt in &master.open_receipts {
            *state
                .receipts
                .entry(receipt.arrival_period.max(now))
                .or_insert(0.0) += receipt.quantity;
        }

        let mut periods = Vec::with_capacity(horizon);

        for offset in 0..horizon {
            let t = now + offset as i32;

            // 1. 当期供给（在途 + 已插入计划订单）
            let incoming_receipts = state.receipts.remove(&t).unwrap_or(0.0);

            // 2. 毛需求
            let gross = forecast.points[offset].mean.max(0.0) * demand_multiplier;

            // 3. 净需求投影
            let projected_available =
                state.projected_on_hand + incoming_receipts - gross;

            // 4. 触发判定与计划订单插入
            //
            // 触发口径含提前期窗口内的待到货: 新订单最早也要 t+提前期
            // 才能到,窗口内已覆盖的缺口不重复下单（与采购时点引擎同口径）
            let pending_within_lead: f64 = state
                .receipts
                .range((t + 1)..=(t + lead))
                .map(|(_, qty)| qty)
                .sum();
            let trigger_position = projected_available + pending_within_lead;

            let mut injected = 0.0;
            if trigger_position < threshold {
                let quantity = config.round_qty(
                    parameters
                        .order_quantity(trigger_position)
                        .max(master.moq())
                        .max(1.0),
                );

                let release_raw = t - lead;
                let expedited = release_raw < now;
                let release_period = release_raw.max(now);
                // 到货期取 需求期 与 下达期+提前期 的较晚者
                let arrival_period = t.max(release_period + lead);

                if arrival_period == t {
                    injected = quantity;
                } else {
                    *state.receipts.entry(arrival_period).or_insert(0.0) += quantity;
                }

                debug!(
                    period = t,
                    projected_available,
                    trigger_position,
                    threshold,
                    quantity,
                    release_period,
                    arrival_period,
                    expedited,
                    "插入计划订单"
                );

                state.orders.push(PlannedOrder {
                    release_period,
                    arrival_period,
                    quantity,
                    expedited,
                    risk_adjusted,
                });
            }

            // 5. 期末投影（带符号,负值=缺口深度）
            let on_hand_end = projected_available + injected;
            periods.push(PeriodProjection {
                period: t,
                gross_requirement: gross,
                incoming_supply: incoming_receipts + injected,
                projected_available,
                projected_on_hand: on_hand_end,
                on_hand_clamped: on_hand_end.max(0.0),
                shortfall: (-on_hand_end).max(0.0),
            });

            state.projected_on_hand = on_hand_end;
        }

        Ok(ReplenishmentPlan {
            scenario,
            lead_time_periods: lead,
            periods,
            planned_orders: state.orders,
            truncated,
        })
    }
}

impl Default for ReplenishmentPlanner {
    fn default() -> Self {
        Self::new()
    }
}
