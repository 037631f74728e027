// ==========================================
// BatchRunner 批量执行集成测试
// ==========================================
// 测试目标: 验证并行分发、失败隔离、协作取消与稳定输出序
// 覆盖范围: 混合批次 + 取消 + 跨运行一致性
// ==========================================


use spare_parts_planner::batch::BatchRunner;
use spare_parts_planner::config::PlanningConfig;
use spare_parts_planner::domain::sku::DemandHistory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use test_helpers::create_test_unit;

fn create_runner() -> BatchRunner {
    BatchRunner::new(Arc::new(PlanningConfig::default()))
}

// ==========================================
// 测试用例: 并行与失败隔离
// ==========================================

#[tokio::test]
async fn test_mixed_batch_isolates_failures() {
    println!("\n=== 测试：单元失败不中止批次,与成功并列上报 ===");

    let runner = create_runner();
    let mut units = vec![
        create_test_unit("SKU_003", "LOC_001"),
        create_test_unit("SKU_001", "LOC_001"),
        create_test_unit("SKU_002", "LOC_001"),
    ];
    // 注入一个成本参数非法的单元
    let mut bad = create_test_unit("SKU_BAD", "LOC_001");
    bad.master.unit_cost = 0.0;
    units.push(bad);
    // 注入一个历史不足的单元（应回退成功,不算失败）
    let mut fallback = create_test_unit("SKU_004", "LOC_001");
    fallback.history = DemandHistory::new(vec![100.0]);
    units.push(fallback);

    let result = runner.run(units).await;

    assert_eq!(result.results.len(), 4);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.cancelled_units, 0);

    let failure = &result.failures[0];
    assert_eq!(failure.key.part_sku, "SKU_BAD");
    assert_eq!(failure.kind_code, "INVALID_COST_PARAMETERS");

    // 回退单元在成功侧
    assert!(result
        .results
        .iter()
        .any(|r| r.key.part_sku == "SKU_004" && r.classification_fallback));
}

#[tokio::test]
async fn test_results_sorted_by_unit_key() {
    println!("\n=== 测试：输出按单元键稳定排序 ===");

    let runner = create_runner();
    let units = vec![
        create_test_unit("SKU_C", "LOC_002"),
        create_test_unit("SKU_A", "LOC_001"),
        create_test_unit("SKU_C", "LOC_001"),
        create_test_unit("SKU_B", "LOC_001"),
    ];

    let result = runner.run(units).await;

    let keys: Vec<String> = result
        .results
        .iter()
        .map(|r| r.key.to_string())
        .collect();
    assert_eq!(
        keys,
        vec![
            "SKU_A@LOC_001",
            "SKU_B@LOC_001",
            "SKU_C@LOC_001",
            "SKU_C@LOC_002"
        ]
    );
}

#[tokio::test]
async fn test_batch_deterministic_across_runs() {
    println!("\n=== 测试：同输入两次批量运行,计划内容完全一致 ===");

    let runner = create_runner();
    let make_units = || {
        vec![
            create_test_unit("SKU_001", "LOC_001"),
            create_test_unit("SKU_002", "LOC_001"),
            create_test_unit("SKU_003", "LOC_002"),
        ]
    };

    let result_a = runner.run(make_units()).await;
    let result_b = runner.run(make_units()).await;

    // run_id/时间戳是批次元数据;计划内容必须逐字节一致
    let rendered_a = serde_json::to_string(&result_a.results).unwrap();
    let rendered_b = serde_json::to_string(&result_b.results).unwrap();
    assert_eq!(rendered_a, rendered_b);
}

// ==========================================
// 测试用例: 协作取消
// ==========================================

#[tokio::test]
async fn test_pre_set_cancel_flag_skips_all_units() {
    println!("\n=== 测试：取消标志在单元边界生效 ===");

    let runner = create_runner();
    let units = vec![
        create_test_unit("SKU_001", "LOC_001"),
        create_test_unit("SKU_002", "LOC_001"),
        create_test_unit("SKU_003", "LOC_001"),
    ];

    let cancel = Arc::new(AtomicBool::new(false));
    cancel.store(true, Ordering::Relaxed); // 运行前已请求取消

    let result = runner.run_with_cancel(units, cancel).await;

    assert!(result.results.is_empty());
    assert!(result.failures.is_empty());
    assert_eq!(result.cancelled_units, 3);
}

#[tokio::test]
async fn test_empty_batch() {
    println!("\n=== 测试：空批次正常返回 ===");

    let runner = create_runner();
    let result = runner.run(Vec::new()).await;

    assert!(result.results.is_empty());
    assert!(result.failures.is_empty());
    assert_eq!(result.cancelled_units, 0);
}
