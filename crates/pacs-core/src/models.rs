//! 核心数据模型定义

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 放射报告
///
/// 引擎的外部输入，接收后不再修改
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub text: String,                         // 报告原文
    pub study_description: Option<String>,    // 检查描述 (如 "CT CHEST W/O CONTRAST")
    pub comparison_date: Option<NaiveDate>,   // 对比检查日期
}

impl Report {
    /// 创建新的报告
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            study_description: None,
            comparison_date: None,
        }
    }

    /// 设置检查描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.study_description = Some(description.into());
        self
    }

    /// 设置对比检查日期
    pub fn with_comparison_date(mut self, date: NaiveDate) -> Self {
        self.comparison_date = Some(date);
        self
    }

    /// 检查描述，缺失时视为空字符串
    pub fn description(&self) -> &str {
        self.study_description.as_deref().unwrap_or("")
    }
}

/// 提取出的印象
///
/// 完全由报告原文推导，不单独持久化
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedImpression {
    pub text: String,
    pub empty: bool, // 未找到IMPRESSION段落或清理后为空
}

impl ExtractedImpression {
    /// 空结果
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            empty: true,
        }
    }

    /// 由规范化后的文本构造，空白文本视为空结果
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            Self::empty()
        } else {
            Self { text, empty: false }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
