// ==========================================
// 备件补货计划系统 - 批量执行层
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 8. 批量执行
// 红线: 单元间零共享可变状态;取消只在单元边界生效,
//       半算完的单元计划没有意义
// ==========================================
// 职责: 按计划单元并行分发引擎链,失败隔离,末端合并
// 输入: Vec<PlanningUnit> + 配置 + 取消标志
// 输出: PlanningBatchResult（按单元键稳定排序）
// ==========================================

use crate::config::PlanningConfig;
use crate::domain::sku::{PlanningUnit, SkuLocationKey};
use crate::engine::orchestrator::{PlanningOrchestrator, SkuPlanResult};
use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// UnitFailure - 单元级失败记录
// ==========================================
// 失败隔离: 单元失败不中止批次,与成功结果并列上报
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitFailure {
    pub key: SkuLocationKey, // 计划单元
    pub kind_code: String,   // 错误类别代码
    pub reason: String,      // 失败原因（可解释性）
}

// ==========================================
// PlanningBatchResult - 批量运行结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningBatchResult {
    pub run_id: Uuid,               // 本次运行标识
    pub generated_at: NaiveDateTime, // 运行时间戳（仅批次元数据,计划产物本身无时间戳）
    pub results: Vec<SkuPlanResult>, // 成功单元（按键升序）
    pub failures: Vec<UnitFailure>,  // 失败单元（按键升序）
    pub cancelled_units: usize,      // 因取消而未执行的单元数
}

// 单元执行结局（内部）
enum UnitOutcome {
    Completed(Box<SkuPlanResult>),
    Failed(UnitFailure),
    Cancelled,
}

// ==========================================
// BatchRunner - 批量执行器
// ==========================================
pub struct BatchRunner {
    orchestrator: Arc<PlanningOrchestrator>,
    max_parallel: usize,
}

impl BatchRunner {
    /// 创建批量执行器
    pub fn new(config: Arc<PlanningConfig>) -> Self {
        let max_parallel = config.max_parallel_units.max(1);
        Self {
            orchestrator: Arc::new(PlanningOrchestrator::new(config)),
            max_parallel,
        }
    }

    /// 执行整批计划（无取消）
    pub async fn run(&self, units: Vec<PlanningUnit>) -> PlanningBatchResult {
        self.run_with_cancel(units, Arc::new(AtomicBool::new(false)))
            .await
    }

    /// 执行整批计划,支持协作式取消
    ///
    /// 取消标志只在单元开始前检查;已进入引擎链的单元会算完,
    /// 未开始的单元整体计入 cancelled_units
    #[instrument(skip_all, fields(units = units.len(), max_parallel = self.max_parallel))]
    pub async fn run_with_cancel(
        &self,
        units: Vec<PlanningUnit>,
        cancel: Arc<AtomicBool>,
    ) -> PlanningBatchResult {
        let run_id = Uuid::new_v4();
        info!(%run_id, "开始批量计划运行");

        let outcomes: Vec<(SkuLocationKey, UnitOutcome)> = stream::iter(units)
            .map(|unit| {
                let orchestrator = self.orchestrator.clone();
                let cancel = cancel.clone();
                async move {
                    let key = unit.key.clone();
                    // 引擎链是纯 CPU 计算,放入阻塞线程池
                    let joined = tokio::task::spawn_blocking(move || {
                        if cancel.load(Ordering::Relaxed) {
                            return UnitOutcome::Cancelled;
                        }
                        match orchestrator.plan_unit(&unit) {
                            Ok(result) => UnitOutcome::Completed(Box::new(result)),
                            Err(err) => UnitOutcome::Failed(UnitFailure {
                                key: unit.key.clone(),
                                kind_code: err.kind_code().to_string(),
                                reason: err.to_string(),
                            }),
                        }
                    })
                    .await;

                    let outcome = match joined {
                        Ok(outcome) => outcome,
                        Err(join_err) => UnitOutcome::Failed(UnitFailure {
                            key: key.clone(),
                            kind_code: "INTERNAL".to_string(),
                            reason: format!("工作线程异常: {}", join_err),
                        }),
                    };
                    (key, outcome)
                }
            })
            .buffer_unordered(self.max_parallel)
            .collect()
            .await;

        // 末端合并: 各单元独立收集,最后按键排序保证稳定输出
        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut cancelled_units = 0usize;
        for (key, outcome) in outcomes {
            match outcome {
                UnitOutcome::Completed(result) => results.push(*result),
                UnitOutcome::Failed(failure) => {
                    warn!(unit = %key, reason = %failure.reason, "单元计划失败");
                    failures.push(failure);
                }
                UnitOutcome::Cancelled => cancelled_units += 1,
            }
        }
        results.sort_by(|a, b| a.key.cmp(&b.key));
        failures.sort_by(|a, b| a.key.cmp(&b.key));

        info!(
            %run_id,
            completed = results.len(),
            failed = failures.len(),
            cancelled = cancelled_units,
            "批量计划运行结束"
        );

        PlanningBatchResult {
            run_id,
            generated_at: chrono::Utc::now().naive_utc(),
            results,
            failures,
            cancelled_units,
        }
    }
}
