//! 修正规则演示程序
//!
//! 展示印象提取、规则编辑、条件匹配和规则备份的完整流程

use chrono::{Duration, Utc};
use pacs_admin::{export_rule_set, RuleBook, RuleDraft};
use pacs_core::Report;
use pacs_workflow::{FixerAction, ImpressionEngine, KeywordSet, RuleCriteria};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("🚀 报告印象修正规则演示\n");

    // 1. 编辑规则
    let mut book = RuleBook::new();
    book.add(
        RuleDraft::new(
            "胸部CT随访建议",
            FixerAction::Insert("Recommend follow-up CT in 12 months.".to_string()),
        )
        .with_criteria(RuleCriteria {
            any_of: KeywordSet::new(["CT", "CHEST"]),
            exclude: KeywordSet::new(["ANGIO"]),
            ..RuleCriteria::default()
        }),
    );
    let interval = book.add(
        RuleDraft::new(
            "近期对比",
            FixerAction::Insert("Compared with prior exam, no interval change.".to_string()),
        )
        .with_criteria(RuleCriteria {
            require_comparison: true,
            max_comparison_weeks: 4,
            ..RuleCriteria::default()
        }),
    );
    let normal_template = book.add(RuleDraft::new(
        "正常模板",
        FixerAction::Replace("Normal examination.".to_string()),
    ));
    book.set_enabled(normal_template, false)?;
    book.move_up(interval)?;
    println!("✅ 规则簿中共有 {} 条规则", book.len());

    // 2. 处理报告
    let now = Utc::now();
    let engine = ImpressionEngine::with_rules(book.snapshot());
    let reports = [
        Report::new(
            "HISTORY: cough\nFINDINGS: clear\nIMPRESSION: 1. Normal study. 2. No acute findings.\nSIGNATURE: Dr. X",
        )
        .with_description("CT CHEST W/O CONTRAST")
        .with_comparison_date((now - Duration::weeks(2)).date_naive()),
        Report::new("IMPRESSION: pt has 2.5 cm nodule\nRECOMMENDATION: biopsy")
            .with_description("CT ANGIO CHEST")
            .with_comparison_date((now - Duration::weeks(6)).date_naive()),
        Report::new("FINDINGS: unremarkable").with_description("XR KNEE"),
    ];

    for report in &reports {
        let outcome = engine.process(report, now);
        println!("\n📋 {} ({} 条规则生效)", report.description(), outcome.applied_rules.len());
        if outcome.extracted.is_empty() {
            println!("   未找到IMPRESSION");
        }
        for line in outcome.final_text.lines() {
            println!("   {}", line);
        }
    }

    // 3. 导出备份
    let backup = export_rule_set(&book.snapshot(), now)?;
    println!("\n💾 规则备份:\n{}", backup);

    Ok(())
}
