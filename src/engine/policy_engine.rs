// ==========================================
// 备件补货计划系统 - 动态策略引擎
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 4. Policy Engine
// 红线: 诊断仿真只评估参数,不回写实时计划路径
// ==========================================
// 职责: 具体策略参数推导 + 成本/服务诊断仿真
// 输入: 策略族 + 推导快照 + 需求画像
// 输出: StockingPolicy + PolicyDiagnostics
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::policy::{DerivationSnapshot, PolicyParameters, StockingPolicy};
use crate::domain::sku::SkuLocationKey;
use crate::domain::types::{DemandPattern, PolicyFamily};
use crate::engine::stock_calc::round_money;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ==========================================
// DemandProfile - 仿真需求画像
// ==========================================
// 平稳/波动: 正态逐期采样
// 间歇/块状: 伯努利发生 x 正态规模的复合采样
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub pattern: DemandPattern, // 需求模式
    pub mean_demand: f64,       // 单期均值
    pub std_demand: f64,        // 单期标准差
    pub frequency: f64,         // 需求发生频率 (0,1]
    pub size_mean: f64,         // 非零需求规模均值
    pub size_std: f64,          // 非零需求规模标准差
}

impl DemandProfile {
    /// 频繁需求画像（无间歇结构）
    pub fn dense(pattern: DemandPattern, mean_demand: f64, std_demand: f64) -> Self {
        Self {
            pattern,
            mean_demand,
            std_demand,
            frequency: 1.0,
            size_mean: mean_demand,
            size_std: std_demand,
        }
    }
}

// ==========================================
// PolicyDiagnostics - 诊断仿真结果
// ==========================================
// 仅用于参数接受/拒绝,不进入实时计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDiagnostics {
    pub simulated_periods: usize,     // 仿真期数
    pub achieved_service_level: f64,  // 达成服务水平（满足率）
    pub stockout_frequency: f64,      // 缺货期频率
    pub expected_holding_cost: f64,   // 期均持有成本（金额两位小数）
    pub adjustments: usize,           // 放宽次数
    pub accepted: bool,               // 参数是否通过验收
}

// ==========================================
// SimCostInputs - 仿真成本口径
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct SimCostInputs {
    pub unit_cost: f64,          // 单位成本
    pub holding_rate: f64,       // 持有成本率/期
    pub lead_time_mean: f64,     // 提前期均值（期）
    pub lead_time_std: f64,      // 提前期标准差（期）
    pub target_service_level: f64, // 目标服务水平
}

// ==========================================
// DynamicPolicyEngine - 动态策略引擎
// ==========================================
pub struct DynamicPolicyEngine {
    // 无状态引擎
}

impl DynamicPolicyEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 参数推导
    // ==========================================

    /// 按策略族推导具体参数
    ///
    /// - 连续盘点: R = ROP, Q = max(EOQ, MOQ)
    /// - 定期盘点: T = 覆写值或 ceil(EOQ/μ_d), s = ROP, S = s + EOQ
    ///
    /// EOQ 不可定哨兵的显式处理: 批量回退为提前期（或盘点周期）
    /// 期望需求覆盖量
    pub fn derive(
        &self,
        family: PolicyFamily,
        snapshot: &DerivationSnapshot,
        mean_demand: f64,
        lead_time_mean: f64,
        moq: f64,
        config: &PlanningConfig,
    ) -> StockingPolicy {
        let mean_demand = mean_demand.max(0.0);
        let parameters = match family {
            PolicyFamily::ContinuousReview => {
                let base_qty = snapshot
                    .eoq
                    .unwrap_or_else(|| mean_demand * lead_time_mean);
                let order_qty = config.round_qty(base_qty.max(moq).max(1.0));
                PolicyParameters::ContinuousReview {
                    order_qty,
                    reorder_point: snapshot.reorder_point,
                }
            }
            PolicyFamily::PeriodicReview => {
                let review_period = config.review_period_override.unwrap_or_else(|| {
                    match snapshot.eoq {
                        Some(eoq) if mean_demand > 0.0 => {
                            (eoq / mean_demand).ceil().max(1.0) as i32
                        }
                        _ => config.default_review_period,
                    }
                });
                let span = snapshot
                    .eoq
                    .unwrap_or_else(|| mean_demand * review_period as f64)
                    .max(moq)
                    .max(1.0);
                PolicyParameters::PeriodicReview {
                    reorder_floor: snapshot.reorder_point,
                    order_up_to: config.round_qty(snapshot.reorder_point + span),
                    review_period,
                }
            }
        };

        StockingPolicy {
            parameters,
            derivation: snapshot.clone(),
        }
    }

    // ==========================================
    // 诊断仿真与参数验收
    // ==========================================

    /// 在合成期上仿真候选参数,不达标则放宽批量后重试
    ///
    /// 仿真用固定种子 StdRng,同输入必得同结果;
    /// 每次放宽重试回放同一需求流,保证对比口径一致
    #[instrument(skip_all, fields(family = %policy.family(), periods = config.simulation_periods))]
    pub fn validate(
        &self,
        policy: StockingPolicy,
        profile: &DemandProfile,
        costs: &SimCostInputs,
        seed: u64,
        config: &PlanningConfig,
    ) -> (StockingPolicy, PolicyDiagnostics) {
        let mut candidate = policy;
        let mut adjustments = 0usize;
        let floor = costs.target_service_level - config.service_tolerance;

        loop {
            let (achieved, stockout_freq, holding) =
                self.simulate_once(&candidate, profile, costs, seed, config);

            if achieved >= floor || adjustments >= config.max_widening_attempts {
                let accepted = achieved >= floor;
                if !accepted {
                    debug!(
                        achieved_service_level = achieved,
                        target = costs.target_service_level,
                        adjustments,
                        "放宽次数用尽,参数按最终候选带拒绝标记输出"
                    );
                }
                let diagnostics = PolicyDiagnostics {
                    simulated_periods: config.simulation_periods,
                    achieved_service_level: achieved,
                    stockout_frequency: stockout_freq,
                    expected_holding_cost: round_money(holding),
                    adjustments,
                    accepted,
                };
                return (candidate, diagnostics);
            }

            adjustments += 1;
            candidate = Self::widen(candidate, config.widening_factor, config);
            debug!(adjustments, "达成服务水平不足,放宽订货批量后重试");
        }
    }

    /// 单次仿真: 到货 → 需求 → 盘点/下单
    ///
    /// 无回补（缺货按流失口径),库存位置 = 在库 + 在途
    fn simulate_once(
        &self,
        policy: &StockingPolicy,
        profile: &DemandProfile,
        costs: &SimCostInputs,
        seed: u64,
        config: &PlanningConfig,
    ) -> (f64, f64, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let periods = config.simulation_periods;

        // 初始库存取目标位,避免启动段虚假缺货污染指标
        let (mut on_hand, review_period) = match policy.parameters {
            PolicyParameters::ContinuousReview {
                order_qty,
                reorder_point,
            } => (reorder_point + order_qty, 1),
            PolicyParameters::PeriodicReview {
                order_up_to,
                review_period,
                ..
            } => (order_up_to, review_period.max(1)),
        };

        let mut outstanding: Vec<(usize, f64)> = Vec::new(); // (到货期, 数量)
        let mut total_demand = 0.0;
        let mut total_filled = 0.0;
        let mut stockout_periods = 0usize;
        let mut on_hand_sum = 0.0;

        for t in 0..periods {
            // 1. 到货
            let mut arrived = 0.0;
            outstanding.retain(|&(due, qty)| {
                if due <= t {
                    arrived += qty;
                    false
                } else {
                    true
                }
            });
            on_hand += arrived;

            // 2. 需求与满足
            let demand = sample_demand(profile, &mut rng);
            let filled = demand.min(on_hand);
            on_hand -= filled;
            total_demand += demand;
            total_filled += filled;
            if demand > filled {
                stockout_periods += 1;
            }

            // 3. 盘点与下单
            let position = on_hand + outstanding.iter().map(|&(_, q)| q).sum::<f64>();
            let order_qty = match policy.parameters {
                PolicyParameters::ContinuousReview {
                    order_qty,
                    reorder_point,
                } => {
                    if position <= reorder_point {
                        order_qty
                    } else {
                        0.0
                    }
                }
                PolicyParameters::PeriodicReview {
                    reorder_floor,
                    order_up_to,
                    ..
                } => {
                    if t % review_period as usize == 0 && position <= reorder_floor {
                        (order_up_to - position).max(0.0)
                    } else {
                        0.0
                    }
                }
            };
            if order_qty > 0.0 {
                let lead = sample_lead_time(costs, &mut rng);
                outstanding.push((t + lead, order_qty));
            }

            on_hand_sum += on_hand;
        }

        let achieved = if total_demand > 0.0 {
            total_filled / total_demand
        } else {
            1.0
        };
        let stockout_freq = stockout_periods as f64 / periods as f64;
        let avg_on_hand = on_hand_sum / periods as f64;
        let holding = avg_on_hand * costs.unit_cost * costs.holding_rate;

        (achieved, stockout_freq, holding)
    }

    /// 放宽批量: 连续盘点放大 Q,定期盘点放大 s→S 跨度
    fn widen(policy: StockingPolicy, factor: f64, config: &PlanningConfig) -> StockingPolicy {
        let parameters = match policy.parameters {
            PolicyParameters::ContinuousReview {
                order_qty,
                reorder_point,
            } => PolicyParameters::ContinuousReview {
                order_qty: config.round_qty(order_qty * factor),
                reorder_point,
            },
            PolicyParameters::PeriodicReview {
                reorder_floor,
                order_up_to,
                review_period,
            } => PolicyParameters::PeriodicReview {
                reorder_floor,
                order_up_to: config
                    .round_qty(reorder_floor + (order_up_to - reorder_floor) * factor),
                review_period,
            },
        };
        StockingPolicy {
            parameters,
            derivation: policy.derivation,
        }
    }
}

impl Default for DynamicPolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 采样辅助
// ==========================================

/// 需求采样（负值截零）
///
/// 间歇/块状用 伯努利(频率) x 正态(规模) 复合分布
fn sample_demand(profile: &DemandProfile, rng: &mut StdRng) -> f64 {
    if profile.pattern.is_sparse() {
        let p = profile.frequency.clamp(0.0, 1.0);
        if p <= 0.0 || !rng.gen_bool(p) {
            return 0.0;
        }
        sample_normal(profile.size_mean, profile.size_std, rng)
    } else {
        sample_normal(profile.mean_demand, profile.std_demand, rng)
    }
}

fn sample_normal(mean: f64, std_dev: f64, rng: &mut StdRng) -> f64 {
    if std_dev <= 0.0 {
        return mean.max(0.0);
    }
    match Normal::new(mean, std_dev) {
        Ok(dist) => dist.sample(rng).max(0.0),
        Err(_) => mean.max(0.0),
    }
}

/// 提前期采样: 正态取样后取整,钳为至少 1 期
fn sample_lead_time(costs: &SimCostInputs, rng: &mut StdRng) -> usize {
    let raw = if costs.lead_time_std > 0.0 {
        match Normal::new(costs.lead_time_mean, costs.lead_time_std) {
            Ok(dist) => dist.sample(rng),
            Err(_) => costs.lead_time_mean,
        }
    } else {
        costs.lead_time_mean
    };
    raw.round().max(1.0) as usize
}

// ==========================================
// 单元种子派生
// ==========================================

/// 配置基础种子与单元键的 FNV-1a 混合
///
/// 不依赖进程哈希随机化,跨运行稳定 → 仿真结果可复现
pub fn unit_seed(base: u64, key: &SkuLocationKey) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET ^ base;
    for byte in key.part_sku.bytes().chain([b'@']).chain(key.location_id.bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
