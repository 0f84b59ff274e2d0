//! 报告印象提取命令行程序

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pacs_admin::{
    backup_rule_set, export_rule_set, init_logging, load_rule_set, parse_rule_set, ConfigManager,
    ImpressionConfig,
};
use pacs_core::{utils::parse_comparison_date, Report};
use pacs_workflow::ImpressionEngine;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "pacs-impression")]
#[command(about = "从放射报告中提取IMPRESSION并应用修正规则")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 提取印象并应用修正规则
    Extract {
        /// 报告文件，"-" 表示标准输入
        #[arg(short, long)]
        report: String,

        /// 检查描述
        #[arg(short, long)]
        description: Option<String>,

        /// 对比检查日期 (YYYY-MM-DD, YYYYMMDD 或 MM/DD/YYYY)
        #[arg(long)]
        comparison_date: Option<String>,

        /// 规则文件，默认使用配置中的路径
        #[arg(long)]
        rules: Option<String>,

        /// 当前时间 (RFC 3339)，默认系统时间
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// 只输出提取结果，不应用修正规则
        #[arg(long)]
        raw: bool,
    },

    /// 规则文件管理
    Rules {
        #[command(subcommand)]
        action: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// 检查规则文件并列出规则
    Check { path: String },

    /// 将规则文件重写为规范格式
    Normalize { input: String, output: String },

    /// 将规则文件备份到配置的备份目录
    Backup { path: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::load(args.config.as_deref())?;
    let mut config = config_manager.get_config().await;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    // 初始化日志
    init_logging(&config.logging)?;

    match args.command {
        Command::Extract {
            report,
            description,
            comparison_date,
            rules,
            now,
            raw,
        } => {
            let comparison_date = comparison_date
                .as_deref()
                .map(parse_comparison_date)
                .transpose()
                .context("Invalid comparison date")?;
            let input = Report {
                text: read_report(&report).await?,
                study_description: description,
                comparison_date,
            };

            let fixers_enabled = !raw && config.engine.fixers_enabled;
            let fixer_rules = if fixers_enabled {
                let rules_path = rules.unwrap_or_else(|| config.rules.rules_file.clone());
                load_rule_set(&rules_path)
                    .await
                    .with_context(|| format!("Could not load rule set {}", rules_path))?
            } else {
                Vec::new()
            };

            let mut engine = ImpressionEngine::with_rules(fixer_rules);
            engine.set_fixers_enabled(fixers_enabled);

            let outcome = engine.process(&input, now.unwrap_or_else(Utc::now));
            if outcome.extracted.is_empty() {
                warn!("No IMPRESSION section found in report {}", report);
            }
            if !outcome.final_text.is_empty() {
                println!("{}", outcome.final_text);
            }
        }
        Command::Rules { action } => run_rules_command(action, &config).await?,
    }

    Ok(())
}

/// 读取报告原文
async fn read_report(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read report from stdin")?;
        return Ok(text);
    }

    tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Failed to read report {}", source))
}

/// 执行规则管理命令
async fn run_rules_command(action: RulesCommand, config: &ImpressionConfig) -> Result<()> {
    match action {
        RulesCommand::Check { path } => {
            let rules = read_rule_file(&path).await?;
            for (index, rule) in rules.iter().enumerate() {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    index + 1,
                    if rule.enabled { "enabled" } else { "disabled" },
                    rule.action.mode_name(),
                    rule.label,
                    rule.id
                );
            }
            info!("Rule set {} is valid ({} rules)", path, rules.len());
        }
        RulesCommand::Normalize { input, output } => {
            let rules = read_rule_file(&input).await?;
            let content = export_rule_set(&rules, Utc::now())?;
            tokio::fs::write(&output, content)
                .await
                .with_context(|| format!("Failed to write {}", output))?;
            info!("Normalized {} rules from {} into {}", rules.len(), input, output);
        }
        RulesCommand::Backup { path } => {
            let path = path.unwrap_or_else(|| config.rules.rules_file.clone());
            let rules = read_rule_file(&path).await?;
            let backup = backup_rule_set(&config.rules.backup_dir, &rules, Utc::now()).await?;
            println!("{}", backup.display());
        }
    }

    Ok(())
}

/// 读取并解析规则文件，文件缺失视为错误
async fn read_rule_file(path: &str) -> Result<Vec<pacs_workflow::FixerRule>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read rule file {}", path))?;
    parse_rule_set(&content).with_context(|| format!("Could not parse rule file {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_args() {
        let args = Args::try_parse_from([
            "pacs-impression",
            "extract",
            "--report",
            "report.txt",
            "--description",
            "CT CHEST",
            "--comparison-date",
            "2024-01-02",
            "--now",
            "2024-06-01T12:00:00Z",
        ])
        .unwrap();

        match args.command {
            Command::Extract { report, description, comparison_date, now, raw, .. } => {
                assert_eq!(report, "report.txt");
                assert_eq!(description.as_deref(), Some("CT CHEST"));
                assert_eq!(comparison_date.as_deref(), Some("2024-01-02"));
                assert!(now.is_some());
                assert!(!raw);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rules_args() {
        let args = Args::try_parse_from(["pacs-impression", "-l", "debug", "rules", "check", "rules.json"])
            .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            args.command,
            Command::Rules { action: RulesCommand::Check { .. } }
        ));
    }
}
