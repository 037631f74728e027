// ==========================================
// 备件补货计划系统 - SKU-库位领域模型
// ==========================================
// 依据: Spare_Parts_Master_Spec.md - PART C 数据与状态体系
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - sku_master/open_receipt
// 红线: 主数据引擎只读,计划产物不可反向污染主数据
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SkuLocationKey - 计划单元主键
// ==========================================
// 计划单元 = 备件号 x 库位,批量输出按此键稳定排序
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkuLocationKey {
    pub part_sku: String,    // 备件号
    pub location_id: String, // 库位标识
}

impl SkuLocationKey {
    pub fn new(part_sku: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            part_sku: part_sku.into(),
            location_id: location_id.into(),
        }
    }
}

impl fmt::Display for SkuLocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.part_sku, self.location_id)
    }
}

// ==========================================
// OpenReceipt - 在途收货
// ==========================================
// 到货期到达后并入当期供给,一次性消耗
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenReceipt {
    pub arrival_period: i32, // 预计到货期（计划期索引）
    pub quantity: f64,       // 到货数量
}

// ==========================================
// SkuMasterData - SKU-库位主数据
// ==========================================
// 用途: 外部主数据层写入,引擎层只读
// 每次计划运行整体传入,引擎不做任何修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuMasterData {
    // ===== 成本参数 =====
    pub unit_cost: f64,      // 单位成本
    pub holding_rate: f64,   // 持有成本率（单位成本比例/期）
    pub ordering_cost: f64,  // 固定订货成本

    // ===== 供应商提前期分布（单位: 期）=====
    pub lead_time_mean: f64, // 提前期均值
    pub lead_time_std: f64,  // 提前期标准差

    // ===== 供应商可靠性 =====
    pub reliability_score: f64, // 可靠性评分 [0,1],用于风险调整提前期

    // ===== 库存现状 =====
    pub on_hand: f64,                  // 当前在库数量（存储态不可为负）
    pub open_receipts: Vec<OpenReceipt>, // 在途收货列表

    // ===== 服务目标 =====
    pub target_service_level: f64, // 目标服务水平 (0,1)

    // ===== 订货约束 =====
    pub min_order_qty: Option<f64>, // 最小订货量（可选）
}

impl SkuMasterData {
    /// 主数据校验（引擎入口统一调用）
    ///
    /// # 校验项
    /// - 在库数量不可为负（负投影是计划信号,不是存储态）
    /// - 服务水平必须落在 (0,1) 开区间
    /// - 提前期标准差不可为负
    /// - 可靠性评分不可为负
    pub fn validate(&self) -> EngineResult<()> {
        if self.on_hand < 0.0 {
            return Err(EngineError::InvalidMasterData {
                field: "on_hand".to_string(),
                reason: format!("在库数量不可为负: {}", self.on_hand),
            });
        }
        if !(self.target_service_level > 0.0 && self.target_service_level < 1.0) {
            return Err(EngineError::InvalidMasterData {
                field: "target_service_level".to_string(),
                reason: format!("服务水平必须位于(0,1): {}", self.target_service_level),
            });
        }
        if self.lead_time_std < 0.0 {
            return Err(EngineError::InvalidMasterData {
                field: "lead_time_std".to_string(),
                reason: format!("提前期标准差不可为负: {}", self.lead_time_std),
            });
        }
        if self.reliability_score < 0.0 {
            return Err(EngineError::InvalidMasterData {
                field: "reliability_score".to_string(),
                reason: format!("可靠性评分不可为负: {}", self.reliability_score),
            });
        }
        if let Some(moq) = self.min_order_qty {
            if moq < 0.0 {
                return Err(EngineError::InvalidMasterData {
                    field: "min_order_qty".to_string(),
                    reason: format!("最小订货量不可为负: {}", moq),
                });
            }
        }
        Ok(())
    }

    /// 最小订货量（未配置时为 0）
    pub fn moq(&self) -> f64 {
        self.min_order_qty.unwrap_or(0.0)
    }
}

// ==========================================
// DemandHistory - 历史需求序列
// ==========================================
// 分类器输入,按期升序;负值视为数据质量问题,由分类器钳为 0
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemandHistory {
    pub quantities: Vec<f64>, // 每期需求量（>= 0）
}

impl DemandHistory {
    pub fn new(quantities: Vec<f64>) -> Self {
        Self { quantities }
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

// ==========================================
// PlanningUnit - 单次计划运行的完整输入
// ==========================================
// 外部协作方一次性装配,批量层按单元并行分发
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningUnit {
    pub key: SkuLocationKey,                  // 计划单元主键
    pub master: SkuMasterData,                // 主数据
    pub history: DemandHistory,               // 历史需求（分类器输入）
    pub forecast: crate::domain::forecast::ForecastSeries, // 需求预测（外部生成）
}
