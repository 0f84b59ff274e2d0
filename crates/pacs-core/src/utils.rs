//! 通用工具函数

use chrono::NaiveDate;

use crate::{PacsError, Result};

/// 支持的对比日期格式
const COMPARISON_DATE_FORMATS: [&str; 3] = [
    "%Y-%m-%d", // ISO 8601
    "%Y%m%d",   // DICOM DA
    "%m/%d/%Y", // 美式日期
];

/// 解析对比检查日期
pub fn parse_comparison_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PacsError::InvalidDate("日期为空".to_string()));
    }

    COMPARISON_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| PacsError::InvalidDate(trimmed.to_string()))
}

/// 拆分逗号分隔的关键词列表，去除空白并转为小写
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comparison_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert_eq!(parse_comparison_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_comparison_date("20240315").unwrap(), expected);
        assert_eq!(parse_comparison_date("03/15/2024").unwrap(), expected);
        assert_eq!(parse_comparison_date("  2024-03-15 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_comparison_date_invalid() {
        assert!(matches!(parse_comparison_date(""), Err(PacsError::InvalidDate(_))));
        assert!(matches!(parse_comparison_date("2023-02-29"), Err(PacsError::InvalidDate(_)))); // 非闰年
        assert!(matches!(parse_comparison_date("last tuesday"), Err(PacsError::InvalidDate(_))));
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(split_keywords("CT, Chest ,,  abd "), vec!["ct", "chest", "abd"]);
        assert!(split_keywords("").is_empty());
        assert!(split_keywords(" , ,").is_empty());
    }
}
