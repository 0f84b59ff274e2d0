//! # PACS工作流模块
//!
//! 提供报告印象的修正规则处理功能，包括：
//! - 修正规则模型：插入 (Insert) 或替换 (Replace) 印象文本
//! - 条件匹配：检查描述关键词与对比检查时效
//! - 修正流水线：按配置顺序依次应用所有匹配规则
//! - 印象引擎：从报告原文到最终印象的完整处理流程

pub mod criteria;
pub mod engine;
pub mod pipeline;
pub mod rule;

// 重新导出主要类型
pub use criteria::{matches, weeks_between};
pub use engine::{ImpressionEngine, ImpressionOutcome};
pub use pipeline::{apply_fixers, fold_rules, matching_rules};
pub use rule::{FixerAction, FixerRule, KeywordSet, RuleCriteria};
