// ==========================================
// 备件补货计划系统 - 需求模式分类引擎
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 1. Demand Classifier
// 红线: 分类是象限制,不是评分制;阈值来自配置,引擎不持有常量
// ==========================================
// 职责: 需求模式四象限判定 + ABC-XYZ 标签
// 输入: 历史需求序列 + 单位成本
// 输出: Classification (模式 + 标签 + 统计量)
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::sku::DemandHistory;
use crate::domain::types::{AbcClass, AbcXyzTag, DemandPattern, XyzClass};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

// ==========================================
// DemandStats - 单元需求统计量
// ==========================================
// 分类依据全量保留,供报表层与可解释性使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandStats {
    pub total_periods: usize,    // 历史期数
    pub nonzero_periods: usize,  // 有需求期数
    pub demand_frequency: f64,   // 需求频率 = 有需求期数/总期数
    pub adi: f64,                // 平均需求间隔 = 总期数/有需求期数
    pub total_demand: f64,       // 累计需求
    pub mean_demand: f64,        // 全序列均值
    pub std_demand: f64,         // 全序列标准差（样本）
    pub mean_nonzero: f64,       // 非零需求均值
    pub std_nonzero: f64,        // 非零需求标准差（样本）
    pub cv: f64,                 // 非零需求变异系数
    pub zero_demand_ratio: f64,  // 零需求期占比
}

// ==========================================
// Classification - 分类结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub pattern: DemandPattern, // 需求模式
    pub tag: AbcXyzTag,         // ABC-XYZ 标签
    pub stats: DemandStats,     // 统计量
    pub reason: String,         // 分类原因（可解释性）
}

// ==========================================
// DemandClassifier - 需求模式分类引擎
// ==========================================
pub struct DemandClassifier {
    // 无状态引擎,阈值由调用方传入
}

impl DemandClassifier {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单元分类（需求模式 + ABC-XYZ）
    ///
    /// # 失败
    /// - 历史期数不足 min_history_periods → InsufficientHistory
    /// - 历史中无任何需求事件（模式不可判定）→ InsufficientHistory
    ///
    /// 调用方收到 InsufficientHistory 后回退到 LUMPY 保守模式,不阻断计划
    #[instrument(skip(self, history, config), fields(periods = history.len()))]
    pub fn classify(
        &self,
        history: &DemandHistory,
        unit_cost: f64,
        config: &PlanningConfig,
    ) -> EngineResult<Classification> {
        if history.len() < config.min_history_periods {
            return Err(EngineError::InsufficientHistory {
                supplied: history.len(),
                required: config.min_history_periods,
            });
        }

        let stats = self.compute_stats(history)?;

        let pattern = Self::classify_pattern(stats.cv, stats.adi, config);
        let tag = AbcXyzTag {
            abc: Self::classify_abc(&stats, unit_cost, config),
            xyz: Self::classify_xyz(&stats, config),
        };

        let reason = format!(
            "CV={:.4} (阈值 {}), ADI={:.4} (阈值 {}) → {}; 标签 {}",
            stats.cv, config.cv_threshold, stats.adi, config.adi_threshold, pattern, tag
        );

        Ok(Classification {
            pattern,
            tag,
            stats,
            reason,
        })
    }

    /// 统计量计算
    ///
    /// 负需求值是上游数据质量问题,钳为 0 并告警
    fn compute_stats(&self, history: &DemandHistory) -> EngineResult<DemandStats> {
        let mut cleaned: Vec<f64> = Vec::with_capacity(history.len());
        for &q in &history.quantities {
            if q < 0.0 {
                warn!(quantity = q, "历史需求为负,按 0 计入");
                cleaned.push(0.0);
            } else {
                cleaned.push(q);
            }
        }

        let total_periods = cleaned.len();
        let nonzero: Vec<f64> = cleaned.iter().copied().filter(|&q| q > 0.0).collect();
        let nonzero_periods = nonzero.len();

        // 无任何需求事件: CV/ADI 无定义,等同历史不足
        if nonzero_periods == 0 {
            return Err(EngineError::InsufficientHistory {
                supplied: 0,
                required: 1,
            });
        }

        let total_demand: f64 = cleaned.iter().sum();
        let mean_demand = total_demand / total_periods as f64;
        let std_demand = sample_std(&cleaned, mean_demand);

        let mean_nonzero = nonzero.iter().sum::<f64>() / nonzero_periods as f64;
        let std_nonzero = sample_std(&nonzero, mean_nonzero);
        let cv = if mean_nonzero > 0.0 {
            std_nonzero / mean_nonzero
        } else {
            0.0
        };

        Ok(DemandStats {
            total_periods,
            nonzero_periods,
            demand_frequency: nonzero_periods as f64 / total_periods as f64,
            adi: total_periods as f64 / nonzero_periods as f64,
            total_demand,
            mean_demand,
            std_demand,
            mean_nonzero,
            std_nonzero,
            cv,
            zero_demand_ratio: 1.0 - nonzero_periods as f64 / total_periods as f64,
        })
    }

    /// 四象限判定
    ///
    /// | ADI < 阈值        | ADI >= 阈值      |
    /// | SMOOTH  (CV低)   | INTERMITTENT    |
    /// | ERRATIC (CV高)   | LUMPY           |
    fn classify_pattern(cv: f64, adi: f64, config: &PlanningConfig) -> DemandPattern {
        let frequent = adi < config.adi_threshold;
        let stable = cv < config.cv_threshold;
        match (frequent, stable) {
            (true, true) => DemandPattern::Smooth,
            (true, false) => DemandPattern::Erratic,
            (false, true) => DemandPattern::Intermittent,
            (false, false) => DemandPattern::Lumpy,
        }
    }

    /// ABC 判定: 年度消耗金额对配置分界
    ///
    /// 单元管线之间无共享状态,故采用金额分界而非组合占比排名
    fn classify_abc(stats: &DemandStats, unit_cost: f64, config: &PlanningConfig) -> AbcClass {
        let annual_value = stats.mean_demand * config.periods_per_year * unit_cost.max(0.0);
        if annual_value >= config.abc_class_a_value {
            AbcClass::A
        } else if annual_value >= config.abc_class_b_value {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }

    /// XYZ 判定: 全序列 CV 对配置分界
    fn classify_xyz(stats: &DemandStats, config: &PlanningConfig) -> XyzClass {
        let cv_total = if stats.mean_demand > 0.0 {
            stats.std_demand / stats.mean_demand
        } else {
            f64::INFINITY
        };
        if cv_total < config.xyz_x_cv {
            XyzClass::X
        } else if cv_total < config.xyz_y_cv {
            XyzClass::Y
        } else {
            XyzClass::Z
        }
    }
}

impl Default for DemandClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// 样本标准差（n-1 口径,单点返回 0）
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    var.sqrt()
}
