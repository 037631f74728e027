// ==========================================
// 备件补货计划系统 - 计划配置
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 10. 配置项全集
// ==========================================
// 职责: 配置加载、默认值、校验
// 红线: 配置在单次运行内只读
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置项越界 (key={key}): {reason}")]
    OutOfRange { key: String, reason: String },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),
}

// ==========================================
// PlanningConfig - 计划引擎配置
// ==========================================
// 所有阈值均可覆写;字段级默认值即出厂配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    // ===== 分类阈值 =====
    pub min_history_periods: usize, // 分类所需最少历史期数
    pub cv_threshold: f64,          // 非零需求 CV 分界（平稳/波动）
    pub adi_threshold: f64,         // 平均需求间隔分界（频繁/稀疏）
    pub xyz_x_cv: f64,              // XYZ: X 档全序列 CV 上限
    pub xyz_y_cv: f64,              // XYZ: Y 档全序列 CV 上限
    pub abc_class_a_value: f64,     // ABC: A 档年度消耗金额下限
    pub abc_class_b_value: f64,     // ABC: B 档年度消耗金额下限

    // ===== 计划水平 =====
    pub planning_horizon: usize, // 计划水平（期数）
    pub periods_per_year: f64,   // 年化系数（期/年）

    // ===== 诊断仿真 =====
    pub simulation_periods: usize,    // 仿真合成期数
    pub simulation_seed: u64,         // 仿真基础种子（与单元键混合）
    pub service_tolerance: f64,       // 达成服务水平允许差
    pub widening_factor: f64,         // 参数拒绝后的批量放宽系数
    pub max_widening_attempts: usize, // 最大放宽次数

    // ===== 定期盘点 =====
    pub review_period_override: Option<i32>, // 盘点间隔覆写（期）
    pub default_review_period: i32,          // EOQ 不可定时的盘点间隔

    // ===== 告警阈值 =====
    pub excess_multiplier: f64,      // 超储判定: 安全库存倍数
    pub excess_sustain_periods: i32, // 超储判定: 须持续超过的期数

    // ===== 情景系数 =====
    pub enable_scenarios: bool,            // 是否输出乐观/悲观情景
    pub best_case_demand_multiplier: f64,  // 乐观需求系数
    pub best_case_lead_multiplier: f64,    // 乐观提前期系数
    pub worst_case_demand_multiplier: f64, // 悲观需求系数
    pub worst_case_lead_multiplier: f64,   // 悲观提前期系数

    // ===== 取整策略 =====
    pub round_up_quantities: bool, // 订货量向上取整开关

    // ===== 预测不确定性 =====
    pub high_uncertainty_ratio: f64,       // 置信区间宽度/均值 触发比
    pub uncertainty_inflation_factor: f64, // 触发后需求标准差放大系数

    // ===== 批量执行 =====
    pub max_parallel_units: usize, // 并行计划单元上限
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            // 分类阈值: CV 0.5 / ADI 1.32 为行业惯例分界
            min_history_periods: 6,
            cv_threshold: 0.5,
            adi_threshold: 1.32,
            xyz_x_cv: 0.5,
            xyz_y_cv: 1.0,
            abc_class_a_value: 50_000.0,
            abc_class_b_value: 10_000.0,

            planning_horizon: 12,
            periods_per_year: 52.0,

            simulation_periods: 360,
            simulation_seed: 20_240_611,
            service_tolerance: 0.05,
            widening_factor: 1.25,
            max_widening_attempts: 3,

            review_period_override: None,
            default_review_period: 4,

            excess_multiplier: 3.0,
            excess_sustain_periods: 2,

            enable_scenarios: true,
            best_case_demand_multiplier: 0.8,
            best_case_lead_multiplier: 0.9,
            worst_case_demand_multiplier: 1.2,
            worst_case_lead_multiplier: 1.25,

            round_up_quantities: true,

            high_uncertainty_ratio: 0.5,
            uncertainty_inflation_factor: 1.2,

            max_parallel_units: 8,
        }
    }
}

impl PlanningConfig {
    /// 从 JSON 字符串加载配置（缺省字段取默认值）并校验
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PlanningConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 配置校验
    ///
    /// 校验失败视为部署错误,直接拒绝整个批次
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn require(ok: bool, key: &str, reason: String) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    key: key.to_string(),
                    reason,
                })
            }
        }

        require(
            self.min_history_periods >= 1,
            "min_history_periods",
            "必须 >= 1".to_string(),
        )?;
        require(self.cv_threshold > 0.0, "cv_threshold", "必须 > 0".to_string())?;
        require(
            self.adi_threshold >= 1.0,
            "adi_threshold",
            "ADI 定义下限为 1".to_string(),
        )?;
        require(
            self.xyz_y_cv > self.xyz_x_cv && self.xyz_x_cv > 0.0,
            "xyz_y_cv",
            format!("必须满足 0 < X档({}) < Y档({})", self.xyz_x_cv, self.xyz_y_cv),
        )?;
        require(
            self.abc_class_a_value > self.abc_class_b_value && self.abc_class_b_value > 0.0,
            "abc_class_a_value",
            format!(
                "必须满足 0 < B档({}) < A档({})",
                self.abc_class_b_value, self.abc_class_a_value
            ),
        )?;
        require(
            self.planning_horizon >= 1,
            "planning_horizon",
            "必须 >= 1".to_string(),
        )?;
        require(
            self.periods_per_year > 0.0,
            "periods_per_year",
            "必须 > 0".to_string(),
        )?;
        require(
            self.simulation_periods >= 1,
            "simulation_periods",
            "必须 >= 1".to_string(),
        )?;
        require(
            (0.0..1.0).contains(&self.service_tolerance),
            "service_tolerance",
            "必须位于 [0,1)".to_string(),
        )?;
        require(
            self.widening_factor > 1.0,
            "widening_factor",
            "放宽系数必须 > 1".to_string(),
        )?;
        require(
            self.default_review_period >= 1,
            "default_review_period",
            "必须 >= 1".to_string(),
        )?;
        if let Some(t) = self.review_period_override {
            require(t >= 1, "review_period_override", "必须 >= 1".to_string())?;
        }
        require(
            self.excess_multiplier > 0.0,
            "excess_multiplier",
            "必须 > 0".to_string(),
        )?;
        require(
            self.excess_sustain_periods >= 0,
            "excess_sustain_periods",
            "必须 >= 0".to_string(),
        )?;
        require(
            self.best_case_demand_multiplier > 0.0
                && self.best_case_demand_multiplier <= 1.0,
            "best_case_demand_multiplier",
            "必须位于 (0,1]".to_string(),
        )?;
        require(
            self.worst_case_demand_multiplier >= 1.0,
            "worst_case_demand_multiplier",
            "必须 >= 1".to_string(),
        )?;
        require(
            self.best_case_lead_multiplier > 0.0 && self.best_case_lead_multiplier <= 1.0,
            "best_case_lead_multiplier",
            "必须位于 (0,1]".to_string(),
        )?;
        require(
            self.worst_case_lead_multiplier >= 1.0,
            "worst_case_lead_multiplier",
            "必须 >= 1".to_string(),
        )?;
        require(
            self.high_uncertainty_ratio > 0.0,
            "high_uncertainty_ratio",
            "必须 > 0".to_string(),
        )?;
        require(
            self.uncertainty_inflation_factor >= 1.0,
            "uncertainty_inflation_factor",
            "必须 >= 1".to_string(),
        )?;
        require(
            self.max_parallel_units >= 1,
            "max_parallel_units",
            "必须 >= 1".to_string(),
        )?;
        Ok(())
    }

    /// 订货量取整（向上取整开关）
    pub fn round_qty(&self, qty: f64) -> f64 {
        if self.round_up_quantities {
            qty.ceil()
        } else {
            qty.round()
        }
    }

    /// 情景系数 (需求系数, 提前期系数)
    pub fn scenario_multipliers(
        &self,
        scenario: crate::domain::types::ScenarioKind,
    ) -> (f64, f64) {
        use crate::domain::types::ScenarioKind;
        match scenario {
            ScenarioKind::BestCase => (
                self.best_case_demand_multiplier,
                self.best_case_lead_multiplier,
            ),
            ScenarioKind::Expected => (1.0, 1.0),
            ScenarioKind::WorstCase => (
                self.worst_case_demand_multiplier,
                self.worst_case_lead_multiplier,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PlanningConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_abc_breakpoints_rejected() {
        let mut config = PlanningConfig::default();
        config.abc_class_a_value = 100.0;
        config.abc_class_b_value = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = PlanningConfig::from_json_str(r#"{"planning_horizon": 24}"#).unwrap();
        assert_eq!(config.planning_horizon, 24);
        assert_eq!(config.cv_threshold, 0.5);
    }

    #[test]
    fn test_round_qty_toggle() {
        let mut config = PlanningConfig::default();
        assert_eq!(config.round_qty(10.2), 11.0);
        config.round_up_quantities = false;
        assert_eq!(config.round_qty(10.2), 10.0);
    }
}
