// ==========================================
// ReplenishmentPlanner 引擎集成测试
// ==========================================
// 测试目标: 验证多期净需求折叠、计划订单插入与确定性
// 覆盖范围: 触发期/到货期 + 净需求恒等式 + 加急 + 情景 + 截断
// ==========================================


use spare_parts_planner::domain::policy::PolicyParameters;
use spare_parts_planner::domain::sku::OpenReceipt;
use spare_parts_planner::domain::types::ScenarioKind;
use spare_parts_planner::engine::error::EngineError;
use spare_parts_planner::engine::replenishment::ReplenishmentPlanner;
use test_helpers::{create_flat_forecast, create_test_config, create_test_master};

fn continuous_params() -> PolicyParameters {
    PolicyParameters::ContinuousReview {
        order_qty: 600.0,
        reorder_point: 300.0,
    }
}

// ==========================================
// 测试用例: 基准触发场景
// ==========================================

#[test]
fn test_trigger_at_third_period_with_matching_lead() {
    println!("\n=== 测试：在库500/均需100/R=300 → 第3期触发 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 6;
    let mut master = create_test_master();
    master.lead_time_std = 0.0; // 提前期恒定 2 期
    let forecast = create_flat_forecast(1, 6, 100.0, 0.0);

    let plan = planner
        .plan(
            &master,
            &continuous_params(),
            &forecast,
            ScenarioKind::Expected,
            &config,
        )
        .unwrap();

    // 期1: 400, 期2: 300（300 < 300 不成立）, 期3: 200 < 300 → 触发
    assert_eq!(plan.planned_orders.len(), 1);
    let order = &plan.planned_orders[0];
    assert_eq!(order.quantity, 600.0);
    assert_eq!(order.release_period, 1); // 需求期 3 - 提前期 2
    assert_eq!(order.arrival_period, 3); // 风险调整提前期吻合
    assert!(!order.expedited);

    assert!((plan.periods[0].projected_available - 400.0).abs() < 1e-9);
    assert!((plan.periods[1].projected_available - 300.0).abs() < 1e-9);
    assert!((plan.periods[2].projected_available - 200.0).abs() < 1e-9);
    // 到货与需求期重合: 期末投影 = 200 + 600
    assert!((plan.periods[2].projected_on_hand - 800.0).abs() < 1e-9);
}

#[test]
fn test_netting_identity_holds_every_period() {
    println!("\n=== 测试：净需求恒等式逐期成立 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 8;
    let mut master = create_test_master();
    master.open_receipts = vec![OpenReceipt {
        arrival_period: 2,
        quantity: 150.0,
    }];
    let forecast = create_flat_forecast(0, 8, 100.0, 20.0);

    let plan = planner
        .plan(
            &master,
            &continuous_params(),
            &forecast,
            ScenarioKind::Expected,
            &config,
        )
        .unwrap();

    // 首期: 上期期末 = 主数据在库
    let first = &plan.periods[0];
    assert!(
        (first.projected_on_hand
            - (master.on_hand + first.incoming_supply - first.gross_requirement))
            .abs()
            < 1e-9
    );
    // 后续每期: on_hand[t] = on_hand[t-1] + incoming[t] - demand[t]（钳零前口径）
    for pair in plan.periods.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        assert!(
            (cur.projected_on_hand
                - (prev.projected_on_hand + cur.incoming_supply - cur.gross_requirement))
                .abs()
                < 1e-9,
            "期 {} 恒等式不成立",
            cur.period
        );
    }
}

#[test]
fn test_deterministic_bit_identical_output() {
    println!("\n=== 测试：同输入两次运行输出完全一致 ===");

    let planner = ReplenishmentPlanner::new();
    let config = create_test_config();
    let master = create_test_master();
    let forecast = create_flat_forecast(0, 12, 100.0, 20.0);
    let params = continuous_params();

    let plan_a = planner
        .plan(&master, &params, &forecast, ScenarioKind::Expected, &config)
        .unwrap();
    let plan_b = planner
        .plan(&master, &params, &forecast, ScenarioKind::Expected, &config)
        .unwrap();

    assert_eq!(plan_a, plan_b);
}

// ==========================================
// 测试用例: 加急与缺口
// ==========================================

#[test]
fn test_past_due_release_clamped_and_flagged_expedited() {
    println!("\n=== 测试：下达期落入过去 → 钳至当前期并打加急标记 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 6;
    let mut master = create_test_master();
    master.on_hand = 0.0;
    master.lead_time_mean = 3.0;
    master.lead_time_std = 0.0;
    let forecast = create_flat_forecast(0, 6, 100.0, 0.0);

    let plan = planner
        .plan(
            &master,
            &continuous_params(),
            &forecast,
            ScenarioKind::Expected,
            &config,
        )
        .unwrap();

    let first = &plan.planned_orders[0];
    assert!(first.expedited);
    assert_eq!(first.release_period, 0); // 0 - 3 < 0 → 钳至当前期
    assert_eq!(first.arrival_period, 3); // max(需求期0, 下达0+提前期3)

    // 到货前的缺口按带符号口径承载,对外口径钳零并单独上报缺口
    assert!((plan.periods[0].projected_on_hand - (-100.0)).abs() < 1e-9);
    assert!((plan.periods[1].projected_on_hand - (-200.0)).abs() < 1e-9);
    assert!((plan.periods[2].projected_on_hand - (-300.0)).abs() < 1e-9);
    assert_eq!(plan.periods[0].on_hand_clamped, 0.0);
    assert!((plan.periods[2].shortfall - 300.0).abs() < 1e-9);

    // 在途计划订单覆盖窗口内缺口,不得逐期重复下单
    let expedited_count = plan
        .planned_orders
        .iter()
        .filter(|o| o.expedited)
        .count();
    assert_eq!(expedited_count, 1);
}

#[test]
fn test_open_receipts_merge_into_arrival_period() {
    println!("\n=== 测试：在途收货并入到货期,过期在途并入首期 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 4;
    let mut master = create_test_master();
    master.on_hand = 1000.0; // 高在库,不触发订单
    master.open_receipts = vec![
        OpenReceipt {
            arrival_period: 2,
            quantity: 300.0,
        },
        OpenReceipt {
            arrival_period: -1, // 已过期 → 并入首期
            quantity: 50.0,
        },
    ];
    let forecast = create_flat_forecast(1, 4, 10.0, 0.0);

    let plan = planner
        .plan(
            &master,
            &continuous_params(),
            &forecast,
            ScenarioKind::Expected,
            &config,
        )
        .unwrap();

    assert!(plan.planned_orders.is_empty());
    assert!((plan.periods[0].incoming_supply - 50.0).abs() < 1e-9); // 期1
    assert!((plan.periods[1].incoming_supply - 300.0).abs() < 1e-9); // 期2
}

// ==========================================
// 测试用例: 情景与退化输入
// ==========================================

#[test]
fn test_scenario_multipliers_order_quantities() {
    println!("\n=== 测试：悲观情景计划量 >= 期望 >= 乐观 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 12;
    let master = create_test_master();
    let forecast = create_flat_forecast(0, 12, 100.0, 20.0);
    let params = continuous_params();

    let best = planner
        .plan(&master, &params, &forecast, ScenarioKind::BestCase, &config)
        .unwrap();
    let expected = planner
        .plan(&master, &params, &forecast, ScenarioKind::Expected, &config)
        .unwrap();
    let worst = planner
        .plan(&master, &params, &forecast, ScenarioKind::WorstCase, &config)
        .unwrap();

    assert!(worst.total_planned_qty() >= expected.total_planned_qty());
    assert!(expected.total_planned_qty() >= best.total_planned_qty());
    // 悲观情景提前期被放大
    assert!(worst.lead_time_periods >= expected.lead_time_periods);
    assert!(best.lead_time_periods <= expected.lead_time_periods);
}

#[test]
fn test_short_forecast_truncates_plan() {
    println!("\n=== 测试：预测短于计划水平 → 截断并打标 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 12;
    let master = create_test_master();
    let forecast = create_flat_forecast(0, 4, 100.0, 20.0);

    let plan = planner
        .plan(
            &master,
            &continuous_params(),
            &forecast,
            ScenarioKind::Expected,
            &config,
        )
        .unwrap();

    assert!(plan.truncated);
    assert_eq!(plan.periods.len(), 4);
}

#[test]
fn test_empty_forecast_rejected() {
    println!("\n=== 测试：空预测序列 → MissingForecast ===");

    let planner = ReplenishmentPlanner::new();
    let config = create_test_config();
    let master = create_test_master();
    let forecast = create_flat_forecast(0, 0, 100.0, 20.0);

    assert!(matches!(
        planner
            .plan(
                &master,
                &continuous_params(),
                &forecast,
                ScenarioKind::Expected,
                &config
            )
            .unwrap_err(),
        EngineError::MissingForecast { .. }
    ));
}

#[test]
fn test_non_contiguous_forecast_rejected() {
    println!("\n=== 测试：期索引断档 → InvalidForecast ===");

    let planner = ReplenishmentPlanner::new();
    let config = create_test_config();
    let master = create_test_master();
    let mut forecast = create_flat_forecast(0, 6, 100.0, 20.0);
    forecast.points[3].period = 10; // 人为断档

    assert!(matches!(
        planner
            .plan(
                &master,
                &continuous_params(),
                &forecast,
                ScenarioKind::Expected,
                &config
            )
            .unwrap_err(),
        EngineError::InvalidForecast { .. }
    ));
}

#[test]
fn test_negative_forecast_mean_clamped() {
    println!("\n=== 测试：负预测均值按 0 计入毛需求 ===");

    let planner = ReplenishmentPlanner::new();
    let mut config = create_test_config();
    config.planning_horizon = 3;
    let mut master = create_test_master();
    master.on_hand = 1000.0;
    let mut forecast = create_flat_forecast(0, 3, 10.0, 2.0);
    forecast.points[1].mean = -40.0;

    let plan = planner
        .plan(
            &master,
            &continuous_params(),
            &forecast,
            ScenarioKind::Expected,
            &config,
        )
        .unwrap();

    assert_eq!(plan.periods[1].gross_requirement, 0.0);
}
