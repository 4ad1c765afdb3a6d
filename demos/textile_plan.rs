//! # 紡織廠週生產計劃範例
//!
//! 這個範例展示完整的求解流程：
//! - 配置：預設紡織廠（或從 JSON 檔載入）
//! - 需求：預設需求（產能不足）與降低後的需求
//! - 覆寫：單次請求暫停一台裁剪機
//!
//! 執行：`RUST_LOG=info cargo run --example textile_plan [config.json]`

use anyhow::Context;
use ppcp::*;
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("===== 紡織廠週生產計劃範例 =====\n");

    // ========== 1. 載入配置 ==========
    println!("[1] 載入配置");
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("無法讀取配置檔 {}", path))?;
            let config = PlanningConfig::from_json(&json)
                .with_context(|| format!("配置檔 {} 無效", path))?;
            println!("    ✓ 從 {} 載入", path);
            config
        }
        None => {
            println!("    ✓ 使用預設紡織廠配置");
            PlanningConfig::textile_default()
        }
    };
    println!(
        "    起始日 {}，{} 週；布料 {} 種，裁剪資源 {} 個，縫製資源 {} 個\n",
        config.horizon.start_date,
        config.horizon.weeks,
        config.fabrics.len(),
        config.cut_resources.len(),
        config.sew_resources.len()
    );

    let planner = ProductionPlanner::new(config)?;

    // ========== 2. 預設需求 ==========
    println!("[2] 預設需求");
    let response = planner.plan(&PlanRequest::textile_default())?;
    print_summary(&response);

    // ========== 3. 降低需求 ==========
    println!("[3] 降低需求（平織布 24000，針織布 32000）");
    let reduced = PlanRequest::new(BTreeMap::from([
        ("Tecido Plano".to_string(), 24000),
        ("Malharia".to_string(), 32000),
    ]));
    let response = planner.plan(&reduced)?;
    print_summary(&response);
    print_aggregated(&response);

    // ========== 4. 單次覆寫 ==========
    println!("[4] 暫停 TX4500 Milenium（僅本次請求）");
    let paused = reduced
        .clone()
        .with_cut_override(CapacityOverride::new("TX4500 Milenium".to_string(), 0, 0));
    match planner.plan(&paused) {
        Ok(response) => print_summary(&response),
        Err(e) => println!("    ✗ 配置錯誤: {}\n", e),
    }

    // ========== 5. JSON 輸出 ==========
    println!("[5] JSON 輸出（圖表資料）");
    let response = planner.plan(&reduced)?;
    println!("{}", serde_json::to_string_pretty(&response.period_totals)?);

    Ok(())
}

fn print_summary(response: &PlanResponse) {
    println!("    {}", response.status_message());
    if let Some(objective) = response.objective_value {
        println!("    目標值: {:.0}", objective);
        println!(
            "    裁剪 {} 件，縫製 {} 件",
            response.stage_total(Stage::Cut),
            response.stage_total(Stage::Sew)
        );
    }
    for warning in &response.warnings {
        println!("    ⚠ [{:?}] {}: {}", warning.severity, warning.subject, warning.message);
    }
    println!("    耗時 {} ms\n", response.solve_time_ms);
}

fn print_aggregated(response: &PlanResponse) {
    println!(
        "    {:<5} {:<4} {:<38} {:<14} {:>8} {:>10} {:>8}",
        "階段", "週", "資源", "布料", "件數", "成本", "平均"
    );
    for row in &response.aggregated {
        let average = row
            .average_cost_weight
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:<5} {:<4} {:<38} {:<14} {:>8} {:>10} {:>8}",
            row.stage.to_string(),
            row.period.to_string(),
            row.resource_id,
            row.fabric_id,
            row.total_quantity,
            row.total_cost.to_string(),
            average
        );
    }
    println!();
}
