//! 印象引擎
//!
//! 协调段落提取、条件匹配和修正规则流水线的核心引擎

use crate::{
    pipeline::{fold_rules, matching_rules},
    rule::FixerRule,
};
use chrono::{DateTime, Utc};
use pacs_core::{ExtractedImpression, Report};
use pacs_report::extract_impression;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 印象引擎
///
/// 持有只读的有序规则列表，克隆后共享同一份规则，可在多个线程中并发使用
#[derive(Debug, Clone)]
pub struct ImpressionEngine {
    rules: Arc<[FixerRule]>,
    fixers_enabled: bool,
}

/// 单份报告的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionOutcome {
    pub extracted: ExtractedImpression,
    pub final_text: String,
    pub applied_rules: Vec<Uuid>, // 按顺序生效的规则ID
}

impl ImpressionOutcome {
    /// 是否有规则生效
    pub fn is_modified(&self) -> bool {
        !self.applied_rules.is_empty()
    }
}

impl ImpressionEngine {
    /// 创建没有规则的引擎
    pub fn new() -> Self {
        Self::with_rules(Vec::new())
    }

    /// 使用给定的有序规则列表创建引擎
    pub fn with_rules(rules: Vec<FixerRule>) -> Self {
        Self {
            rules: rules.into(),
            fixers_enabled: true,
        }
    }

    /// 启用或停用修正规则，停用时只输出提取结果
    pub fn set_fixers_enabled(&mut self, enabled: bool) {
        self.fixers_enabled = enabled;
    }

    /// 当前规则列表
    pub fn rules(&self) -> &[FixerRule] {
        &self.rules
    }

    /// 处理单份报告
    pub fn process(&self, report: &Report, now: DateTime<Utc>) -> ImpressionOutcome {
        let extracted = extract_impression(&report.text);

        if !self.fixers_enabled {
            tracing::debug!("Fixer rules disabled, returning extracted impression");
            return ImpressionOutcome {
                final_text: extracted.text.clone(),
                extracted,
                applied_rules: Vec::new(),
            };
        }

        let matched = matching_rules(
            &self.rules,
            report.study_description.as_deref(),
            report.comparison_date,
            now,
        );
        let applied_rules: Vec<Uuid> = matched.iter().map(|rule| rule.id).collect();
        let final_text = fold_rules(&extracted.text, matched);

        tracing::info!(
            "Processed report: impression_found={}, {} of {} rules applied, {} bytes output",
            !extracted.is_empty(),
            applied_rules.len(),
            self.rules.len(),
            final_text.len()
        );

        ImpressionOutcome {
            extracted,
            final_text,
            applied_rules,
        }
    }
}

impl Default for ImpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}
