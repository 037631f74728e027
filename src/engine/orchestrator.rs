// ==========================================
// 备件补货计划系统 - 引擎编排器
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 1.1 计算主流程
// 用途: 协调单计划单元的完整引擎链
// 流程: 分类 → 策略选择 → 库存计算 → 参数验收 → 采购时点/多期计划 → 告警
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::alert::Alert;
use crate::domain::plan::{PlannedOrder, ReplenishmentPlan};
use crate::domain::policy::StockingPolicy;
use crate::domain::sku::{PlanningUnit, SkuLocationKey};
use crate::domain::types::{AbcClass, AbcXyzTag, DemandPattern, ScenarioKind, XyzClass};
use crate::engine::alerts::AlertEngine;
use crate::engine::classifier::{Classification, DemandClassifier, DemandStats};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::policy_engine::{
    unit_seed, DemandProfile, DynamicPolicyEngine, PolicyDiagnostics, SimCostInputs,
};
use crate::engine::policy_selector::PolicySelector;
use crate::engine::replenishment::ReplenishmentPlanner;
use crate::engine::scheduler::ProcurementScheduler;
use crate::engine::stock_calc::{StockCalcInputs, StockCalculator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ==========================================
// SkuPlanResult - 单元计划结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuPlanResult {
    pub key: SkuLocationKey, // 计划单元主键

    // 分类输出
    pub pattern: DemandPattern,          // 需求模式
    pub tag: AbcXyzTag,                  // ABC-XYZ 标签
    pub demand_stats: Option<DemandStats>, // 统计量（保守回退时为 None）
    pub classification_fallback: bool,   // 历史不足,采用保守回退
    pub classification_reason: String,   // 分类原因

    // 策略输出
    pub policy: StockingPolicy,          // 生效策略（含推导快照）
    pub diagnostics: PolicyDiagnostics,  // 诊断仿真结果

    // 计划输出
    pub next_order: Option<PlannedOrder>, // 采购时点引擎建议的当期订单
    pub plans: Vec<ReplenishmentPlan>,    // 情景计划（期望在首位）
    pub alerts: Vec<Alert>,               // 告警（按期望情景轨迹）
    pub forecast_truncated: bool,         // 预测短于计划水平
}

impl SkuPlanResult {
    /// 期望情景计划
    pub fn expected_plan(&self) -> Option<&ReplenishmentPlan> {
        self.plans
            .iter()
            .find(|p| p.scenario == ScenarioKind::Expected)
    }
}

// ==========================================
// PlanningOrchestrator - 引擎编排器
// ==========================================
pub struct PlanningOrchestrator {
    config: Arc<PlanningConfig>,
    classifier: DemandClassifier,
    selector: PolicySelector,
    calculator: StockCalculator,
    policy_engine: DynamicPolicyEngine,
    scheduler: ProcurementScheduler,
    planner: ReplenishmentPlanner,
    alert_engine: AlertEngine,
}

impl PlanningOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 运行期只读配置
    pub fn new(config: Arc<PlanningConfig>) -> Self {
        Self {
            classifier: DemandClassifier::new(),
            selector: PolicySelector::new(),
            calculator: StockCalculator::new(),
            policy_engine: DynamicPolicyEngine::new(),
            scheduler: ProcurementScheduler::new(),
            planner: ReplenishmentPlanner::new(),
            alert_engine: AlertEngine::new(),
            config,
        }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// 执行单计划单元的完整引擎链
    ///
    /// 单元内任何引擎失败只影响本单元;分类器的 InsufficientHistory
    /// 例外——回退到保守模式(LUMPY)继续计划
    #[instrument(skip(self, unit), fields(unit = %unit.key))]
    pub fn plan_unit(&self, unit: &PlanningUnit) -> EngineResult<SkuPlanResult> {
        let config = self.config.as_ref();
        info!(
            history_periods = unit.history.len(),
            forecast_periods = unit.forecast.len(),
            "开始单元计划流程"
        );

        // ==========================================
        // 步骤0: 输入校验
        // ==========================================
        unit.master.validate()?;
        unit.forecast.validate(config.planning_horizon)?;

        // ==========================================
        // 步骤1: Demand Classifier - 需求模式分类
        // ==========================================
        debug!("步骤1: 需求模式分类");
        let (pattern, tag, demand_stats, fallback, classification_reason) =
            self.classify_with_fallback(unit)?;

        // ==========================================
        // 步骤2: Policy Selector - 策略族选择
        // ==========================================
        debug!("步骤2: 策略族选择");
        let family = self.selector.select(pattern, tag);

        // ==========================================
        // 步骤3: Stock Calculator - 安全库存/EOQ
        // ==========================================
        debug!("步骤3: 安全库存与 EOQ 计算");
        let (mean_demand, std_demand) = self.forecast_aggregates(unit);
        let snapshot = self.calculator.compute(&StockCalcInputs {
            mean_demand,
            std_demand,
            lead_time_mean: unit.master.lead_time_mean,
            lead_time_std: unit.master.lead_time_std,
            service_level: unit.master.target_service_level,
            unit_cost: unit.master.unit_cost,
            holding_rate: unit.master.holding_rate,
            ordering_cost: unit.master.ordering_cost,
            periods_per_year: config.periods_per_year,
        })?;

        // ==========================================
        // 步骤4: Policy Engine - 参数推导 + 诊断仿真
        // ==========================================
        debug!("步骤4: 策略参数推导与诊断仿真");
        let derived = self.policy_engine.derive(
            family,
            &snapshot,
            mean_demand,
            unit.master.lead_time_mean,
            unit.master.moq(),
            config,
        );
        let profile = match &demand_stats {
            Some(stats) => DemandProfile {
                pattern,
                mean_demand,
                std_demand,
                frequency: stats.demand_frequency,
                size_mean: stats.mean_nonzero,
                size_std: stats.std_nonzero,
            },
            None => DemandProfile::dense(pattern, mean_demand, std_demand),
        };
        let (policy, diagnostics) = self.policy_engine.validate(
            derived,
            &profile,
            &SimCostInputs {
                unit_cost: unit.master.unit_cost,
                holding_rate: unit.master.holding_rate,
                lead_time_mean: unit.master.lead_time_mean,
                lead_time_std: unit.master.lead_time_std,
                target_service_level: unit.master.target_service_level,
            },
            unit_seed(config.simulation_seed, &unit.key),
            config,
        );

        // ==========================================
        // 步骤5: Procurement Scheduler - 采购时点
        // ==========================================
        debug!("步骤5: 采购时点判定");
        let now = unit.forecast.start_period().unwrap_or(0);
        let next_order = self.scheduler.next_order(
            &unit.master,
            &policy.parameters,
            &unit.forecast,
            now,
            config,
        )?;

        // ==========================================
        // 步骤6: Replenishment Planner - 多期净需求
        // ==========================================
        debug!("步骤6: 多期补货计划");
        let mut plans = Vec::new();
        plans.push(self.planner.plan(
            &unit.master,
            &policy.parameters,
            &unit.forecast,
            ScenarioKind::Expected,
            config,
        )?);
        if config.enable_scenarios {
            for scenario in [ScenarioKind::BestCase, ScenarioKind::WorstCase] {
                plans.push(self.planner.plan(
                    &unit.master,
                    &policy.parameters,
                    &unit.forecast,
                    scenario,
                    config,
                )?);
            }
        }

        // ==========================================
        // 步骤7: Alert Engine - 告警生成
        // ==========================================
        debug!("步骤7: 告警生成");
        let forecast_truncated = plans[0].truncated;
        let alerts = self.alert_engine.scan(
            &unit.key,
            &plans[0].periods,
            policy.derivation.safety_stock,
            mean_demand,
            config,
        );

        info!(
            pattern = %pattern,
            tag = %tag,
            family = %policy.family(),
            planned_orders = plans[0].planned_orders.len(),
            alerts = alerts.len(),
            "单元计划流程完成"
        );

        Ok(SkuPlanResult {
            key: unit.key.clone(),
            pattern,
            tag,
            demand_stats,
            classification_fallback: fallback,
            classification_reason,
            policy,
            diagnostics,
            next_order,
            plans,
            alerts,
            forecast_truncated,
        })
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 分类,历史不足时回退保守模式
    ///
    /// 回退口径: 模式 LUMPY;价值档按预测口径年化金额;波动档取 Z
    fn classify_with_fallback(
        &self,
        unit: &PlanningUnit,
    ) -> EngineResult<(DemandPattern, AbcXyzTag, Option<DemandStats>, bool, String)> {
        let config = self.config.as_ref();
        match self
            .classifier
            .classify(&unit.history, unit.master.unit_cost, config)
        {
            Ok(Classification {
                pattern,
                tag,
                stats,
                reason,
            }) => Ok((pattern, tag, Some(stats), false, reason)),
            Err(EngineError::InsufficientHistory { supplied, required }) => {
                warn!(supplied, required, "历史不足,回退保守模式 LUMPY");
                let (mean_forecast, _) = self.forecast_aggregates(unit);
                let annual_value =
                    mean_forecast * config.periods_per_year * unit.master.unit_cost.max(0.0);
                let abc = if annual_value >= config.abc_class_a_value {
                    AbcClass::A
                } else if annual_value >= config.abc_class_b_value {
                    AbcClass::B
                } else {
                    AbcClass::C
                };
                let tag = AbcXyzTag {
                    abc,
                    xyz: XyzClass::Z,
                };
                let reason = format!(
                    "历史 {} 期不足 {} 期,保守回退 LUMPY / {}",
                    supplied, required, tag
                );
                Ok((DemandPattern::Lumpy, tag, None, true, reason))
            }
            Err(other) => Err(other),
        }
    }

    /// 预测横截面聚合 + 高不确定性加宽
    fn forecast_aggregates(&self, unit: &PlanningUnit) -> (f64, f64) {
        let config = self.config.as_ref();
        let (mean_demand, mut std_demand) =
            unit.forecast.aggregate(config.planning_horizon);

        if let Some(ci_width) = unit.forecast.confidence_interval_width {
            if mean_demand > 0.0 && ci_width / mean_demand > config.high_uncertainty_ratio {
                debug!(
                    ci_width,
                    mean_demand, "预测不确定性偏高,放大需求标准差以加宽安全库存"
                );
                std_demand *= config.uncertainty_inflation_factor;
            }
        }
        (mean_demand, std_demand)
    }
}
