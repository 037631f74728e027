// ==========================================
// 备件补货计划系统 - 领域类型定义
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 0.2 分类与策略体系
// 红线: 封闭枚举 + 穷举匹配,不做多态类层次
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 需求模式 (Demand Pattern)
// ==========================================
// 依据: CV(变异系数) x ADI(平均需求间隔) 四象限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandPattern {
    Smooth,       // 平稳: CV低 + 需求频繁
    Erratic,      // 波动: CV高 + 需求频繁
    Intermittent, // 间歇: CV低 + 需求稀疏
    Lumpy,        // 块状: CV高 + 需求稀疏
}

impl fmt::Display for DemandPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandPattern::Smooth => write!(f, "SMOOTH"),
            DemandPattern::Erratic => write!(f, "ERRATIC"),
            DemandPattern::Intermittent => write!(f, "INTERMITTENT"),
            DemandPattern::Lumpy => write!(f, "LUMPY"),
        }
    }
}

impl DemandPattern {
    /// 是否为稀疏需求（间歇/块状）
    pub fn is_sparse(&self) -> bool {
        matches!(self, DemandPattern::Intermittent | DemandPattern::Lumpy)
    }
}

// ==========================================
// ABC 价值等级 (ABC Class)
// ==========================================
// 按年度消耗金额分档,阈值来自配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A, // 高价值
    B, // 中价值
    C, // 低价值
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}

// ==========================================
// XYZ 波动等级 (XYZ Class)
// ==========================================
// 按全序列变异系数分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum XyzClass {
    X, // 稳定
    Y, // 中等波动
    Z, // 高波动
}

impl fmt::Display for XyzClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XyzClass::X => write!(f, "X"),
            XyzClass::Y => write!(f, "Y"),
            XyzClass::Z => write!(f, "Z"),
        }
    }
}

// ==========================================
// ABC-XYZ 组合标签
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbcXyzTag {
    pub abc: AbcClass, // 价值维度
    pub xyz: XyzClass, // 波动维度
}

impl fmt::Display for AbcXyzTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.abc, self.xyz)
    }
}

// ==========================================
// 策略族 (Policy Family)
// ==========================================
// 依据: Planning_Engine_Specs 2. Policy Selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyFamily {
    ContinuousReview, // 连续盘点 (Q,R)
    PeriodicReview,   // 定期盘点 (s,S)
}

impl fmt::Display for PolicyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyFamily::ContinuousReview => write!(f, "CONTINUOUS_REVIEW"),
            PolicyFamily::PeriodicReview => write!(f, "PERIODIC_REVIEW"),
        }
    }
}

// ==========================================
// 计划情景 (Scenario Kind)
// ==========================================
// 依据: Planning_Engine_Specs 6.4 情景计划
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioKind {
    BestCase,  // 乐观: 需求/提前期缩减
    Expected,  // 期望: 预测原值
    WorstCase, // 悲观: 需求/提前期放大
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::BestCase => write!(f, "BEST_CASE"),
            ScenarioKind::Expected => write!(f, "EXPECTED"),
            ScenarioKind::WorstCase => write!(f, "WORST_CASE"),
        }
    }
}

// ==========================================
// 告警类型 (Alert Kind)
// ==========================================
// 依据: Planning_Engine_Specs 7. Alert Engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    Stockout,        // 缺货: 投影库存为负
    ExcessInventory, // 超储: 投影库存持续高于安全库存倍数
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Stockout => write!(f, "STOCKOUT"),
            AlertKind::ExcessInventory => write!(f, "EXCESS_INVENTORY"),
        }
    }
}

// ==========================================
// 告警严重度 (Alert Severity)
// ==========================================
// 顺序: Info < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Info,     // 提示
    Warning,  // 关注
    Critical, // 危险
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
