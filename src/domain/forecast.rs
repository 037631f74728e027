// ==========================================
// 备件补货计划系统 - 需求预测领域模型
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 外部接口·预测协作方
// 红线: 预测序列只读,期索引连续严格递增
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastPoint - 单期预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: i32,  // 期索引（计划原点起连续递增）
    pub mean: f64,    // 预测均值
    pub std_dev: f64, // 预测标准差
}

// ==========================================
// ForecastSeries - 预测序列
// ==========================================
// 由预测协作方（树模型/统计/集成）生成,本引擎只消费
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>, // 按期升序

    // 预测模型报告的置信区间宽度（可选）
    // 高不确定性预测用于加宽安全库存
    pub confidence_interval_width: Option<f64>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Self {
        Self {
            points,
            confidence_interval_width: None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 序列起始期（空序列返回 None）
    pub fn start_period(&self) -> Option<i32> {
        self.points.first().map(|p| p.period)
    }

    /// 校验期索引连续且严格递增
    ///
    /// # 失败
    /// - 序列为空 → MissingForecast
    /// - 期索引断档或乱序 → InvalidForecast
    pub fn validate(&self, horizon: usize) -> EngineResult<()> {
        if self.points.is_empty() {
            return Err(EngineError::MissingForecast {
                supplied: 0,
                horizon,
            });
        }
        for pair in self.points.windows(2) {
            if pair[1].period != pair[0].period + 1 {
                return Err(EngineError::InvalidForecast {
                    reason: format!(
                        "期索引必须连续递增: {} 之后出现 {}",
                        pair[0].period, pair[1].period
                    ),
                });
            }
        }
        Ok(())
    }

    /// 水平期内均值/标准差的横截面聚合
    ///
    /// 返回 (均值的平均, 标准差的平均);负预测均值按 0 计
    pub fn aggregate(&self, horizon: usize) -> (f64, f64) {
        let n = self.points.len().min(horizon).max(1);
        let slice = &self.points[..self.points.len().min(horizon)];
        if slice.is_empty() {
            return (0.0, 0.0);
        }
        let mean_sum: f64 = slice.iter().map(|p| p.mean.max(0.0)).sum();
        let std_sum: f64 = slice.iter().map(|p| p.std_dev.max(0.0)).sum();
        (mean_sum / n as f64, std_sum / n as f64)
    }

    /// 自起始期偏移 offset 的预测均值（越界返回 None）
    pub fn mean_at_offset(&self, offset: usize) -> Option<f64> {
        self.points.get(offset).map(|p| p.mean.max(0.0))
    }
}
