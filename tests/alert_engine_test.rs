// ==========================================
// AlertEngine 引擎集成测试
// ==========================================
// 测试目标: 验证缺货/超储告警的区段合并与严重度
// 覆盖范围: 单期缺口 + 连续缺口 + 超储持续期门槛 + 瞬时冲高
// ==========================================


use spare_parts_planner::domain::plan::PeriodProjection;
use spare_parts_planner::domain::sku::SkuLocationKey;
use spare_parts_planner::domain::types::{AlertKind, AlertSeverity};
use spare_parts_planner::engine::alerts::AlertEngine;
use test_helpers::create_test_config;

// ==========================================
// 测试辅助函数
// ==========================================

/// 构造仅投影库存有意义的轨迹点
fn create_point(period: i32, projected_on_hand: f64) -> PeriodProjection {
    PeriodProjection {
        period,
        gross_requirement: 100.0,
        incoming_supply: 0.0,
        projected_available: projected_on_hand,
        projected_on_hand,
        on_hand_clamped: projected_on_hand.max(0.0),
        shortfall: (-projected_on_hand).max(0.0),
    }
}

fn test_key() -> SkuLocationKey {
    SkuLocationKey::new("SKU_001", "LOC_001")
}

// ==========================================
// 测试用例: 缺货告警
// ==========================================

#[test]
fn test_single_period_deficit_yields_exactly_one_alert() {
    println!("\n=== 测试：第3期投影 -5 → 恰好一条缺货告警 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    let trajectory = vec![
        create_point(1, 200.0),
        create_point(2, 80.0),
        create_point(3, -5.0),
        create_point(4, 120.0),
        create_point(5, 150.0),
    ];

    let alerts = engine.scan(&test_key(), &trajectory, 100.0, 100.0, &config);

    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.kind, AlertKind::Stockout);
    assert_eq!(alert.period, 3);
    assert_eq!(alert.duration_periods, 1);
    // 幅度 5 体现在投影量上
    assert!((alert.projected_quantity - (-5.0)).abs() < 1e-9);
    // 缺口 5 远小于单期均值 100,单期 → WARNING
    assert_eq!(alert.severity, AlertSeverity::Warning);
}

#[test]
fn test_consecutive_deficit_merged_into_single_run() {
    println!("\n=== 测试：连续缺口合并为一条告警,按深度x持续升级 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    let trajectory = vec![
        create_point(0, 100.0),
        create_point(1, -100.0),
        create_point(2, -200.0),
        create_point(3, -300.0),
        create_point(4, 500.0),
    ];

    let alerts = engine.scan(&test_key(), &trajectory, 100.0, 100.0, &config);

    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.kind, AlertKind::Stockout);
    assert_eq!(alert.period, 1); // 锚定区段首期
    assert_eq!(alert.duration_periods, 3);
    assert!((alert.projected_quantity - (-300.0)).abs() < 1e-9); // 最深缺口
    assert_eq!(alert.severity, AlertSeverity::Critical);
}

#[test]
fn test_two_separate_deficit_runs_yield_two_alerts() {
    println!("\n=== 测试：两段分离缺口 → 两条告警 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    let trajectory = vec![
        create_point(0, -10.0),
        create_point(1, 50.0),
        create_point(2, -20.0),
        create_point(3, 60.0),
    ];

    let alerts = engine.scan(&test_key(), &trajectory, 100.0, 100.0, &config);

    let stockouts: Vec<_> = alerts
        .iter()
        .filter(|a| a.kind == AlertKind::Stockout)
        .collect();
    assert_eq!(stockouts.len(), 2);
    assert_eq!(stockouts[0].period, 0);
    assert_eq!(stockouts[1].period, 2);
}

// ==========================================
// 测试用例: 超储告警
// ==========================================

#[test]
fn test_sustained_excess_inventory_flagged() {
    println!("\n=== 测试：持续超储 → 一条告警,锚定区段首期 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    // 安全库存 100,超储阈值 = 3 x 100 = 300;持续期门槛 2 → 需 >2 期
    let trajectory = vec![
        create_point(0, 200.0),
        create_point(1, 400.0),
        create_point(2, 450.0),
        create_point(3, 420.0),
        create_point(4, 200.0),
    ];

    let alerts = engine.scan(&test_key(), &trajectory, 100.0, 100.0, &config);

    assert_eq!(alerts.len(), 1);
    let alert = &alerts[0];
    assert_eq!(alert.kind, AlertKind::ExcessInventory);
    assert_eq!(alert.period, 1);
    assert_eq!(alert.duration_periods, 3);
    assert!((alert.projected_quantity - 450.0).abs() < 1e-9); // 峰值
}

#[test]
fn test_transient_spike_not_flagged() {
    println!("\n=== 测试：大额到货后的瞬时冲高不告警 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    // 仅 2 期高于阈值,未超过持续期门槛 2
    let trajectory = vec![
        create_point(0, 100.0),
        create_point(1, 800.0),
        create_point(2, 700.0),
        create_point(3, 200.0),
    ];

    let alerts = engine.scan(&test_key(), &trajectory, 100.0, 100.0, &config);
    assert!(alerts.is_empty());
}

#[test]
fn test_zero_safety_stock_uses_mean_demand_fallback() {
    println!("\n=== 测试：安全库存为 0 时以单期均值兜底超储基准 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    // SS=0,均需 100 → 阈值 300;正常库存 150 不得被判超储
    let trajectory = vec![
        create_point(0, 150.0),
        create_point(1, 150.0),
        create_point(2, 150.0),
        create_point(3, 150.0),
    ];

    let alerts = engine.scan(&test_key(), &trajectory, 0.0, 100.0, &config);
    assert!(alerts.is_empty());
}

#[test]
fn test_healthy_trajectory_yields_no_alerts() {
    println!("\n=== 测试：健康轨迹零告警 ===");

    let engine = AlertEngine::new();
    let config = create_test_config();
    let trajectory: Vec<_> = (0..12).map(|t| create_point(t, 180.0)).collect();

    let alerts = engine.scan(&test_key(), &trajectory, 100.0, 100.0, &config);
    assert!(alerts.is_empty());
}
