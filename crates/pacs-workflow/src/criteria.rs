//! 规则条件匹配
//!
//! 根据检查描述关键词和对比检查时效判断规则是否适用

use chrono::{DateTime, NaiveDate, Utc};

use crate::rule::{FixerRule, RuleCriteria};

/// 判断规则是否匹配当前检查
///
/// 缺失的检查描述按空字符串处理：非空的必需/任一条件不满足，排除条件不触发。
/// 这样没有关键词条件的规则只取决于启用状态和对比检查时效，与描述是否存在无关；
/// 只有排除条件的规则也会匹配，因为不存在的描述不含任何被排除的关键词。
/// 排除条件优先于其他条件。
pub fn matches(
    rule: &FixerRule,
    study_description: Option<&str>,
    comparison_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> bool {
    if !rule.enabled {
        return false;
    }

    let description = study_description.unwrap_or("").to_lowercase();
    keywords_match(&rule.criteria, &description)
        && comparison_matches(&rule.criteria, comparison_date, now)
}

/// 评估关键词条件，description 需已转为小写
fn keywords_match(criteria: &RuleCriteria, description: &str) -> bool {
    if !criteria.exclude.is_empty() && criteria.exclude.any_found_in(description) {
        return false;
    }
    if !criteria.required.is_empty() && !criteria.required.all_found_in(description) {
        return false;
    }
    if !criteria.any_of.is_empty() && !criteria.any_of.any_found_in(description) {
        return false;
    }
    true
}

/// 评估对比检查条件
fn comparison_matches(
    criteria: &RuleCriteria,
    comparison_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> bool {
    if !criteria.require_comparison {
        return true;
    }

    let Some(comparison_date) = comparison_date else {
        return false;
    };

    if criteria.max_comparison_weeks == 0 {
        return true;
    }

    weeks_between(comparison_date, now) <= i64::from(criteria.max_comparison_weeks)
}

/// 对比日期到当前时间经过的整周数 (向下取整，未来日期计为 0)
pub fn weeks_between(comparison_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let days = now
        .date_naive()
        .signed_duration_since(comparison_date)
        .num_days();
    days.max(0).div_euclid(7)
}
