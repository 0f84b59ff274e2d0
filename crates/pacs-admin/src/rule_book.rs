//! 修正规则编辑存储
//!
//! 维护有序的规则列表，供编辑界面增删改和调整顺序；
//! 引擎只通过 snapshot 获取只读副本

use std::collections::HashSet;

use pacs_core::{PacsError, Result};
use pacs_workflow::{FixerAction, FixerRule, RuleCriteria};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::rules::ensure_unique_ids;

/// 规则草稿 (不含ID)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub enabled: bool,
    pub label: String,
    pub action: FixerAction,
    pub criteria: RuleCriteria,
}

impl RuleDraft {
    pub fn new(label: impl Into<String>, action: FixerAction) -> Self {
        Self {
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
}

/// 规则簿
///
/// 记录所有发出或加载过的ID，ID一经使用不再复用
#[derive(Debug, Default)]
pub struct RuleBook {
    rules: Vec<FixerRule>,
    issued_ids: HashSet<Uuid>,
}

impl RuleBook {
    /// 创建空规则簿
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加规则，返回新分配的ID
    pub fn add(&mut self, draft: RuleDraft) -> Uuid {
        let id = self.next_id();
        self.rules.push(FixerRule {
            id,
            enabled: draft.enabled,
            label: draft.label,
            action: draft.action,
            criteria: draft.criteria,
        });
        info!("Fixer rule {} added at position {}", id, self.rules.len() - 1);
        id
    }

    /// 更新规则内容，保持ID和位置不变
    pub fn update(&mut self, id: Uuid, draft: RuleDraft) -> Result<()> {
        let rule = self.get_mut(id)?;
        rule.enabled = draft.enabled;
        rule.label = draft.label;
        rule.action = draft.action;
        rule.criteria = draft.criteria;
        info!("Fixer rule {} updated", id);
        Ok(())
    }

    /// 删除规则，ID不会被重新分配
    pub fn remove(&mut self, id: Uuid) -> Result<FixerRule> {
        let index = self.position(id)?;
        let rule = self.rules.remove(index);
        info!("Fixer rule {} removed", id);
        Ok(rule)
    }

    /// 启用或停用规则
    pub fn set_enabled(&mut self, id: Uuid, enabled: bool) -> Result<()> {
        self.get_mut(id)?.enabled = enabled;
        Ok(())
    }

    /// 上移一位，已在首位时不变
    pub fn move_up(&mut self, id: Uuid) -> Result<()> {
        let index = self.position(id)?;
        if index > 0 {
            self.rules.swap(index, index - 1);
        }
        Ok(())
    }

    /// 下移一位，已在末位时不变
    pub fn move_down(&mut self, id: Uuid) -> Result<()> {
        let index = self.position(id)?;
        if index + 1 < self.rules.len() {
            self.rules.swap(index, index + 1);
        }
        Ok(())
    }

    /// 获取规则
    pub fn get(&self, id: Uuid) -> Option<&FixerRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 当前有序规则列表的只读副本
    pub fn snapshot(&self) -> Vec<FixerRule> {
        self.rules.clone()
    }

    /// 从备份恢复，替换当前全部规则
    pub fn restore(&mut self, rules: Vec<FixerRule>) -> Result<()> {
        ensure_unique_ids(&rules)?;

        self.issued_ids.extend(rules.iter().map(|rule| rule.id));
        self.rules = rules;

        info!("Rule book restored with {} rules", self.rules.len());
        Ok(())
    }

    fn next_id(&mut self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.issued_ids.insert(id) {
                return id;
            }
        }
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.rules
            .iter()
            .position(|rule| rule.id == id)
            .ok_or_else(|| PacsError::NotFound(format!("Fixer rule {} not found", id)))
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut FixerRule> {
        let index = self.position(id)?;
        Ok(&mut self.rules[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(label: &str) -> RuleDraft {
        RuleDraft::new(label, FixerAction::Insert(label.to_string()))
    }

    fn labels(book: &RuleBook) -> Vec<String> {
        book.snapshot().into_iter().map(|rule| rule.label).collect()
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut book = RuleBook::new();
        let a = book.add(draft("a"));
        let b = book.add(draft("b"));

        assert_ne!(a, b);
        assert_eq!(book.len(), 2);
        assert_eq!(book.get(a).unwrap().label, "a");
    }

    #[test]
    fn test_reorder() {
        let mut book = RuleBook::new();
        let a = book.add(draft("a"));
        let b = book.add(draft("b"));
        let c = book.add(draft("c"));

        book.move_up(c).unwrap();
        assert_eq!(labels(&book), vec!["a", "c", "b"]);

        book.move_up(a).unwrap();
        assert_eq!(labels(&book), vec!["a", "c", "b"]);

        book.move_down(a).unwrap();
        book.move_down(b).unwrap();
        assert_eq!(labels(&book), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_update_and_toggle() {
        let mut book = RuleBook::new();
        let id = book.add(draft("a"));

        book.update(id, RuleDraft::new("renamed", FixerAction::Replace("x".to_string())))
            .unwrap();
        book.set_enabled(id, false).unwrap();

        let rule = book.get(id).unwrap();
        assert_eq!(rule.label, "renamed");
        assert_eq!(rule.action, FixerAction::Replace("x".to_string()));
        assert!(!rule.enabled);
    }

    #[test]
    fn test_remove() {
        let mut book = RuleBook::new();
        let a = book.add(draft("a"));
        book.add(draft("b"));

        let removed = book.remove(a).unwrap();
        assert_eq!(removed.label, "a");
        assert_eq!(labels(&book), vec!["b"]);
        assert!(book.get(a).is_none());
    }

    #[test]
    fn test_unknown_id() {
        let mut book = RuleBook::new();
        let missing = Uuid::new_v4();

        assert!(matches!(book.remove(missing), Err(PacsError::NotFound(_))));
        assert!(matches!(book.move_up(missing), Err(PacsError::NotFound(_))));
        assert!(matches!(book.set_enabled(missing, true), Err(PacsError::NotFound(_))));
        assert!(matches!(book.update(missing, draft("x")), Err(PacsError::NotFound(_))));
    }

    #[test]
    fn test_restore() {
        let mut source = RuleBook::new();
        source.add(draft("a"));
        source.add(draft("b"));

        let mut book = RuleBook::new();
        book.add(draft("old"));
        book.restore(source.snapshot()).unwrap();

        assert_eq!(labels(&book), vec!["a", "b"]);
        assert!(book.issued_ids.len() >= 3);
    }

    #[test]
    fn test_restore_rejects_duplicates() {
        let rule = FixerRule::new("a", FixerAction::Insert("a".to_string()));
        let mut book = RuleBook::new();

        let result = book.restore(vec![rule.clone(), rule]);
        assert!(matches!(result, Err(PacsError::DuplicateRule(_))));
        assert!(book.is_empty());
    }
}
