// ==========================================
// 备件补货计划系统 - 告警引擎
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 7. Alert Engine
// 红线: 纯函数,只读轨迹;缺货判定用带符号(钳零前)口径
// ==========================================
// 职责: 扫描投影轨迹,产出缺货/超储结构化告警
// 输入: 投影轨迹 + 安全库存 + 配置阈值
// 输出: Vec<Alert>
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::alert::Alert;
use crate::domain::plan::PeriodProjection;
use crate::domain::sku::SkuLocationKey;
use crate::domain::types::{AlertKind, AlertSeverity};
use tracing::instrument;

// ==========================================
// AlertEngine - 告警引擎
// ==========================================
pub struct AlertEngine {
    // 无状态引擎
}

impl AlertEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 扫描单元轨迹,产出告警列表
    ///
    /// - 缺货: 连续负投影区段合并为一条告警,锚定区段首期,
    ///   严重度由缺口深度（相对单期均值）与持续期数共同决定
    /// - 超储: 投影持续高于 超储倍数 x 安全库存 且超过持续期阈值;
    ///   大额到货后的瞬时冲高不告警（持续期门槛天然过滤）
    #[instrument(skip_all, fields(unit = %key, periods = trajectory.len()))]
    pub fn scan(
        &self,
        key: &SkuLocationKey,
        trajectory: &[PeriodProjection],
        safety_stock: f64,
        mean_demand: f64,
        config: &PlanningConfig,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        alerts.extend(self.scan_stockouts(key, trajectory, mean_demand));
        alerts.extend(self.scan_excess(key, trajectory, safety_stock, mean_demand, config));
        alerts
    }

    /// 缺货区段检测（带符号投影 < 0）
    fn scan_stockouts(
        &self,
        key: &SkuLocationKey,
        trajectory: &[PeriodProjection],
        mean_demand: f64,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let mut run: Option<(i32, i32, f64)> = None; // (起始期, 期数, 最深缺口)

        for point in trajectory {
            if point.projected_on_hand < 0.0 {
                let depth = -point.projected_on_hand;
                run = Some(match run {
                    None => (point.period, 1, depth),
                    Some((start, len, max_depth)) => (start, len + 1, max_depth.max(depth)),
                });
            } else if let Some((start, len, depth)) = run.take() {
                alerts.push(self.stockout_alert(key, start, len, depth, mean_demand));
            }
        }
        if let Some((start, len, depth)) = run {
            alerts.push(self.stockout_alert(key, start, len, depth, mean_demand));
        }
        alerts
    }

    fn stockout_alert(
        &self,
        key: &SkuLocationKey,
        start: i32,
        duration: i32,
        depth: f64,
        mean_demand: f64,
    ) -> Alert {
        // 严重度: 缺口深度达单期均值,或持续 2 期以上 → CRITICAL
        let depth_ratio = depth / mean_demand.max(1.0);
        let severity = if depth_ratio >= 1.0 || duration >= 2 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };
        Alert {
            key: key.clone(),
            period: start,
            kind: AlertKind::Stockout,
            severity,
            projected_quantity: -depth,
            duration_periods: duration,
            reason: format!(
                "自期 {} 起连续 {} 期投影缺货,最深缺口 {:.2}",
                start, duration, depth
            ),
        }
    }

    /// 超储区段检测
    ///
    /// 安全库存为 0 时以单期均值兜底,避免零阈值把所有正库存判为超储
    fn scan_excess(
        &self,
        key: &SkuLocationKey,
        trajectory: &[PeriodProjection],
        safety_stock: f64,
        mean_demand: f64,
        config: &PlanningConfig,
    ) -> Vec<Alert> {
        let base = if safety_stock > 0.0 {
            safety_stock
        } else {
            mean_demand.max(1.0)
        };
        let threshold = config.excess_multiplier * base;

        let mut alerts = Vec::new();
        let mut run: Option<(i32, i32, f64)> = None; // (起始期, 期数, 峰值库存)

        for point in trajectory {
            if point.projected_on_hand > threshold {
                let peak = point.projected_on_hand;
                run = Some(match run {
                    None => (point.period, 1, peak),
                    Some((start, len, max_peak)) => (start, len + 1, max_peak.max(peak)),
                });
            } else {
                if let Some(alert) =
                    self.excess_alert_if_sustained(key, run.take(), threshold, config)
                {
                    alerts.push(alert);
                }
            }
        }
        if let Some(alert) = self.excess_alert_if_sustained(key, run, threshold, config) {
            alerts.push(alert);
        }
        alerts
    }

    fn excess_alert_if_sustained(
        &self,
        key: &SkuLocationKey,
        run: Option<(i32, i32, f64)>,
        threshold: f64,
        config: &PlanningConfig,
    ) -> Option<Alert> {
        let (start, duration, peak) = run?;
        // 须严格超过持续期阈值,瞬时冲高不告警
        if duration <= config.excess_sustain_periods {
            return None;
        }
        let severity = if peak > 2.0 * threshold {
            AlertSeverity::Warning
        } else {
            AlertSeverity::Info
        };
        Some(Alert {
            key: key.clone(),
            period: start,
            kind: AlertKind::ExcessInventory,
            severity,
            projected_quantity: peak,
            duration_periods: duration,
            reason: format!(
                "自期 {} 起连续 {} 期投影库存高于超储阈值 {:.2},峰值 {:.2}",
                start, duration, threshold, peak
            ),
        })
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new()
    }
}
