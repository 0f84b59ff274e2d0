//! 修正规则模型
//!
//! 规则在配置序列中的顺序有意义：所有匹配的启用规则按顺序依次生效

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// 规则动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "text")]
pub enum FixerAction {
    Insert(String),  // 追加到印象末尾
    Replace(String), // 整体替换印象
}

impl FixerAction {
    /// 规则文本
    pub fn text(&self) -> &str {
        match self {
            FixerAction::Insert(text) | FixerAction::Replace(text) => text,
        }
    }

    /// 模式名称，与外部记录格式一致
    pub fn mode_name(&self) -> &'static str {
        match self {
            FixerAction::Insert(_) => "Insert",
            FixerAction::Replace(_) => "Replace",
        }
    }

    /// 将动作作用于当前印象
    pub fn apply(&self, impression: String) -> String {
        match self {
            FixerAction::Replace(text) => text.clone(),
            FixerAction::Insert(text) => {
                if impression.is_empty() {
                    text.clone()
                } else {
                    let mut result = impression;
                    result.push('\n');
                    result.push_str(text);
                    result
                }
            }
        }
    }
}

/// 规范化的关键词集合 (小写、去除首尾空白、无空项)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// 所有关键词都出现在 haystack 中 (haystack 需已转为小写)
    pub fn all_found_in(&self, haystack: &str) -> bool {
        self.0.iter().all(|keyword| haystack.contains(keyword.as_str()))
    }

    /// 至少一个关键词出现在 haystack 中 (haystack 需已转为小写)
    pub fn any_found_in(&self, haystack: &str) -> bool {
        self.0.iter().any(|keyword| haystack.contains(keyword.as_str()))
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// 规则匹配条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCriteria {
    pub required: KeywordSet,      // 必须全部出现
    pub any_of: KeywordSet,        // 至少出现一个
    pub exclude: KeywordSet,       // 不能出现
    pub require_comparison: bool,  // 需要对比检查
    pub max_comparison_weeks: u32, // 对比检查最大间隔周数，0 表示不限
}

/// 修正规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixerRule {
    pub id: Uuid,
    pub enabled: bool,
    pub label: String,
    pub action: FixerAction,
    pub criteria: RuleCriteria,
}

impl FixerRule {
    /// 创建新的启用规则，条件为空 (匹配所有检查)
    pub fn new(label: impl Into<String>, action: FixerAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            enabled: true,
            label: label.into(),
            action,
            criteria: RuleCriteria::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: RuleCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_required<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.required = KeywordSet::new(keywords);
        self
    }

    pub fn with_any_of<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.any_of = KeywordSet::new(keywords);
        self
    }

    pub fn with_exclude<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.exclude = KeywordSet::new(keywords);
        self
    }

    /// 要求存在对比检查，max_weeks 为 0 时不限间隔
    pub fn with_comparison(mut self, max_weeks: u32) -> Self {
        self.criteria.require_comparison = true;
        self.criteria.max_comparison_weeks = max_weeks;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
