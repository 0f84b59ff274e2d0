//! 修正规则的外部记录格式与备份/恢复
//!
//! 条件字段在外部以逗号分隔的字符串表示，拆分和规范化在此边界完成

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pacs_core::utils::split_keywords;
use pacs_core::{PacsError, Result};
use pacs_workflow::{FixerAction, FixerRule, KeywordSet, RuleCriteria};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 当前备份格式版本
pub const RULE_SET_VERSION: u32 = 1;

/// 规则的外部记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub label: String,
    pub mode: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub require_comparison: bool,
    #[serde(default)]
    pub max_comparison_weeks: u32,
    #[serde(default)]
    pub criteria_required: String,
    #[serde(default)]
    pub criteria_any_of: String,
    #[serde(default)]
    pub criteria_exclude: String,
}

fn default_enabled() -> bool {
    true
}

/// 备份文件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub rules: Vec<RuleRecord>,
}

impl RuleRecord {
    /// 转换为引擎使用的规则
    pub fn into_rule(self) -> Result<FixerRule> {
        let action = match self.mode.trim().to_ascii_lowercase().as_str() {
            "insert" => FixerAction::Insert(self.text),
            "replace" => FixerAction::Replace(self.text),
            other => {
                return Err(PacsError::Validation(format!(
                    "规则 {} 的模式无效: {:?}",
                    self.id, other
                )))
            }
        };

        Ok(FixerRule {
            id: self.id,
            enabled: self.enabled,
            label: self.label,
            action,
            criteria: RuleCriteria {
                required: KeywordSet::new(split_keywords(&self.criteria_required)),
                any_of: KeywordSet::new(split_keywords(&self.criteria_any_of)),
                exclude: KeywordSet::new(split_keywords(&self.criteria_exclude)),
                require_comparison: self.require_comparison,
                max_comparison_weeks: self.max_comparison_weeks,
            },
        })
    }

    /// 由规则生成外部记录
    pub fn from_rule(rule: &FixerRule) -> Self {
        Self {
            id: rule.id,
            enabled: rule.enabled,
            label: rule.label.clone(),
            mode: rule.action.mode_name().to_string(),
            text: rule.action.text().to_string(),
            require_comparison: rule.criteria.require_comparison,
            max_comparison_weeks: rule.criteria.max_comparison_weeks,
            criteria_required: join_keywords(&rule.criteria.required),
            criteria_any_of: join_keywords(&rule.criteria.any_of),
            criteria_exclude: join_keywords(&rule.criteria.exclude),
        }
    }
}

fn join_keywords(set: &KeywordSet) -> String {
    set.iter().collect::<Vec<_>>().join(", ")
}

/// 解析备份内容，支持完整备份文件或规则记录数组
pub fn parse_rule_set(json: &str) -> Result<Vec<FixerRule>> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let records: Vec<RuleRecord> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        let document: RuleSetDocument = serde_json::from_value(value)?;
        if document.version > RULE_SET_VERSION {
            return Err(PacsError::Validation(format!(
                "不支持的备份版本: {} (当前支持 {})",
                document.version, RULE_SET_VERSION
            )));
        }
        document.rules
    };

    let rules = records
        .into_iter()
        .map(RuleRecord::into_rule)
        .collect::<Result<Vec<_>>>()?;

    ensure_unique_ids(&rules)?;

    debug!("Parsed rule set with {} rules", rules.len());
    Ok(rules)
}

/// 检查规则ID唯一
pub fn ensure_unique_ids(rules: &[FixerRule]) -> Result<()> {
    let mut seen = HashSet::with_capacity(rules.len());
    for rule in rules {
        if !seen.insert(rule.id) {
            return Err(PacsError::DuplicateRule(rule.id));
        }
    }
    Ok(())
}

/// 导出为备份文件内容
pub fn export_rule_set(rules: &[FixerRule], exported_at: DateTime<Utc>) -> Result<String> {
    let document = RuleSetDocument {
        version: RULE_SET_VERSION,
        exported_at,
        rules: rules.iter().map(RuleRecord::from_rule).collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// 从文件加载规则，文件不存在时返回空规则集
pub async fn load_rule_set(path: impl AsRef<Path>) -> Result<Vec<FixerRule>> {
    let path = path.as_ref();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Rule set file {:?} not found, using empty rule set", path);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let rules = parse_rule_set(&content)?;
    info!("Loaded {} fixer rules from {:?}", rules.len(), path);
    Ok(rules)
}

/// 将规则保存为备份文件
pub async fn save_rule_set(path: impl AsRef<Path>, rules: &[FixerRule]) -> Result<()> {
    let path = path.as_ref();
    let content = export_rule_set(rules, Utc::now())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;

    info!("Saved {} fixer rules to {:?}", rules.len(), path);
    Ok(())
}

/// 在备份目录中写入带时间戳的备份文件，返回文件路径
pub async fn backup_rule_set(
    backup_dir: impl AsRef<Path>,
    rules: &[FixerRule],
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = backup_dir
        .as_ref()
        .join(format!("fixer_rules_{}.json", now.format("%Y%m%d_%H%M%S")));
    save_rule_set(&path, rules).await?;
    Ok(path)
}
