// ==========================================
// 备件补货计划系统 - 告警领域模型
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 7. Alert Engine
// 红线: 告警必须输出 reason（可解释性）
// ==========================================

use crate::domain::sku::SkuLocationKey;
use crate::domain::types::{AlertKind, AlertSeverity};
use serde::{Deserialize, Serialize};

// ==========================================
// Alert - 结构化告警
// ==========================================
// 每次运行整体重建,不做增量维护
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub key: SkuLocationKey,     // 计划单元
    pub period: i32,             // 异常区段起始期
    pub kind: AlertKind,         // 告警类型
    pub severity: AlertSeverity, // 严重度（幅度 x 持续期）
    pub projected_quantity: f64, // 投影量（缺货为最深负值,超储为最高库存）
    pub duration_periods: i32,   // 异常区段持续期数
    pub reason: String,          // 告警原因（可解释性）
}
