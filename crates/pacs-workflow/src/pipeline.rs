//! 修正规则流水线
//!
//! 按配置顺序筛选匹配规则，并依次作用于印象文本

use chrono::{DateTime, NaiveDate, Utc};

use crate::criteria::matches;
use crate::rule::FixerRule;

/// 按配置顺序返回所有匹配的规则
pub fn matching_rules<'a>(
    rules: &'a [FixerRule],
    study_description: Option<&str>,
    comparison_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Vec<&'a FixerRule> {
    rules
        .iter()
        .filter(|rule| matches(rule, study_description, comparison_date, now))
        .collect()
}

/// 将匹配的规则依次作用于印象
///
/// Replace 丢弃之前所有结果，Insert 追加到当前结果之后。
/// 没有规则匹配时返回原印象。
pub fn apply_fixers(
    impression: &str,
    rules: &[FixerRule],
    study_description: Option<&str>,
    comparison_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> String {
    fold_rules(
        impression,
        matching_rules(rules, study_description, comparison_date, now),
    )
}

/// 依次应用已筛选的规则
pub fn fold_rules<'a, I>(impression: &str, rules: I) -> String
where
    I: IntoIterator<Item = &'a FixerRule>,
{
    rules
        .into_iter()
        .fold(impression.to_string(), |accumulator, rule| {
            tracing::debug!(
                "Applying fixer rule {} ({}) as {}",
                rule.id,
                rule.label,
                rule.action.mode_name()
            );
            rule.action.apply(accumulator)
        })
}
