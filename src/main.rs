// ==========================================
// 备件补货计划系统 - 批量运行入口
// ==========================================
// 用途: 读取 JSON 输入（配置 + 计划单元）,执行整批计划,
//       结果以 JSON 输出到标准输出
// 输入/输出的落盘与展示属于外部协作方,本入口只做搬运
// ==========================================

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use spare_parts_planner::batch::BatchRunner;
use spare_parts_planner::config::PlanningConfig;
use spare_parts_planner::domain::sku::PlanningUnit;
use spare_parts_planner::logging;
use std::sync::Arc;
use tracing::info;

// ==========================================
// PlanningInput - 运行输入
// ==========================================
#[derive(Debug, Deserialize)]
struct PlanningInput {
    #[serde(default)]
    config: PlanningConfig, // 缺省字段取出厂配置
    units: Vec<PlanningUnit>, // 计划单元全集
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("用法: spare-parts-planner <输入JSON路径>"),
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("读取输入文件失败: {}", path))?;
    let input: PlanningInput =
        serde_json::from_str(&raw).context("输入 JSON 解析失败")?;
    input.config.validate().context("配置校验失败")?;

    info!(
        units = input.units.len(),
        horizon = input.config.planning_horizon,
        "装载计划输入完成"
    );

    let runner = BatchRunner::new(Arc::new(input.config));
    let result = runner.run(input.units).await;

    let rendered =
        serde_json::to_string_pretty(&result).context("结果序列化失败")?;
    println!("{}", rendered);
    Ok(())
}
