use std::path::Path;

use anyhow::Context;
use offer_desk::{BusinessCalendar, build_report, load_offers, load_query, setup_environment};
use shared::util::now_millis;

fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment();

    tracing::info!(
        environment = %config.environment,
        offers_file = %config.offers_file,
        "Offer desk starting"
    );

    // 2. 业务日历
    let calendar = BusinessCalendar::now(config.timezone());

    // 3. 加载快照与筛选条件
    let offers = load_offers(Path::new(&config.offers_file))
        .with_context(|| format!("loading offers from {}", config.offers_file))?;
    let query = load_query(config.query_file.as_deref().map(Path::new))
        .context("loading offer query")?;

    // 4. 生成报表
    let report = build_report(&offers, &query, &calendar, now_millis()).inspect_err(|e| {
        tracing::error!(
            code = %e.code,
            category = e.code.category().name(),
            "Report failed: {}",
            e
        );
    })?;
    tracing::info!(
        today = %report.today,
        shown = report.view.len(),
        total = report.overall_stats.total,
        overdue = report.overdue.len(),
        "Report ready"
    );

    let output = if config.is_production() {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);
    Ok(())
}
