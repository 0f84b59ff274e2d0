//! IMPRESSION段落提取
//!
//! 报告是口述转录的非结构化文本，这里不做完整语法分析：
//! 从第一个 "IMPRESSION" 开始截取，直到下一个以固定段落标题开头的行。
//! 无法识别的报告返回空结果，而不是输出残缺内容。

use std::sync::LazyLock;

use pacs_core::ExtractedImpression;
use regex::Regex;
use tracing::debug;

use crate::normalizer::{collapse_whitespace, normalize};
use crate::reflow::reflow_numbered_items;

/// 作为IMPRESSION截止边界的段落标题 (不区分大小写)
pub const SECTION_STOP_WORDS: [&str; 11] = [
    "TECHNIQUE",
    "FINDINGS",
    "CLINICAL HISTORY",
    "COMPARISON",
    "EXAM",
    "PROCEDURE",
    "INDICATION",
    "CONCLUSION",
    "RECOMMENDATION",
    "SIGNATURE",
    "ELECTRONICALLY SIGNED",
];

/// IMPRESSION标题 (可为复数)，可带冒号及同一行内的空白
///
/// 不吞掉换行，否则下一行的缩进段落标题会丢失行首位置
static IMPRESSION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)IMPRESSIONS?\b[ \t]*:?[ \t]*").expect("impression header pattern is valid")
});

/// 行首 (允许前导空白) 的段落标题，后接冒号或行尾
static SECTION_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    let words = SECTION_STOP_WORDS
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?im)^[ \t]*(?:{words})[ \t]*(?::|\r?$)"))
        .expect("section boundary pattern is valid")
});

/// 从报告原文中提取规范化的印象文本
pub fn extract_impression(raw_text: &str) -> ExtractedImpression {
    if raw_text.trim().is_empty() {
        return ExtractedImpression::empty();
    }

    let Some(header) = IMPRESSION_HEADER.find(raw_text) else {
        debug!("No IMPRESSION header found in report ({} bytes)", raw_text.len());
        return ExtractedImpression::empty();
    };

    // find_at 保留前文上下文，行首锚点只会匹配真正的新行
    let start = header.end();
    let end = SECTION_BOUNDARY
        .find_at(raw_text, start)
        .map(|boundary| boundary.start())
        .unwrap_or(raw_text.len());

    let capture = raw_text[start..end].trim();
    if capture.is_empty() {
        debug!("IMPRESSION section is blank");
        return ExtractedImpression::empty();
    }

    let cleaned = normalize(&collapse_whitespace(capture));
    let impression = ExtractedImpression::from_text(reflow_numbered_items(&cleaned));

    debug!(
        "Extracted impression: {} bytes captured, {} bytes after cleaning",
        capture.len(),
        impression.text.len()
    );

    impression
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_impression_between_sections() {
        let raw = "HISTORY: cough\nFINDINGS: clear\nIMPRESSION: 1. Normal study. 2. No acute findings.\nSIGNATURE: Dr. X";
        let result = extract_impression(raw);

        assert!(!result.is_empty());
        assert_eq!(result.as_str(), "1. Normal study.\n2. No acute findings.");
    }

    #[test]
    fn test_decimal_measurement_not_split() {
        let result = extract_impression("IMPRESSION: pt has 2.5 cm nodule");
        assert_eq!(result.as_str(), "pt has 2.5 cm nodule");
    }

    #[test]
    fn test_missing_impression() {
        assert!(extract_impression("").is_empty());
        assert!(extract_impression("   \n\t").is_empty());
        assert!(extract_impression("FINDINGS: normal heart size.\nCONCLUSION: normal").is_empty());
    }

    #[test]
    fn test_blank_impression_section() {
        assert!(extract_impression("IMPRESSION:\n\nFINDINGS: clear").is_empty());
        assert!(extract_impression("IMPRESSION:   ").is_empty());
        // 只有被丢弃的字符
        assert!(extract_impression("IMPRESSION: \u{201C}\u{201D}").is_empty());
    }

    #[test]
    fn test_case_insensitive_header_and_stop_words() {
        let raw = "impression:\nStable postoperative changes.\n  electronically signed\nby Dr. Y";
        assert_eq!(extract_impression(raw).as_str(), "Stable postoperative changes.");
    }

    #[test]
    fn test_indented_stop_header_after_blank_impression() {
        assert!(extract_impression("IMPRESSION:\n  FINDINGS: clear lungs").is_empty());
        assert!(extract_impression("IMPRESSION:\n\tTECHNIQUE: PA view").is_empty());
        assert!(extract_impression("IMPRESSION \r\n   SIGNATURE\r\nDr. Z").is_empty());
    }

    #[test]
    fn test_indented_stop_header_after_indented_body() {
        let raw = "IMPRESSION:\n  Mild atelectasis.\n  SIGNATURE: Dr. Z";
        assert_eq!(extract_impression(raw).as_str(), "Mild atelectasis.");

        let raw = "IMPRESSION:\n\t1. Stable. 2. No effusion.\n\tRECOMMENDATION: none";
        assert_eq!(extract_impression(raw).as_str(), "1. Stable.\n2. No effusion.");
    }

    #[test]
    fn test_plural_header() {
        assert_eq!(extract_impression("IMPRESSIONS:\nNo acute").as_str(), "No acute");
        assert_eq!(extract_impression("Impressions No acute").as_str(), "No acute");
    }

    #[test]
    fn test_multiline_capture_collapsed() {
        let raw = "IMPRESSION\r\n  Mild cardiomegaly.\r\n\r\n  No effusion.\r\nRECOMMENDATION: none";
        assert_eq!(extract_impression(raw).as_str(), "Mild cardiomegaly. No effusion.");
    }

    #[test]
    fn test_stop_word_inside_prose_is_not_a_boundary() {
        let raw = "IMPRESSION: No acute findings. Comparison: prior exam unchanged.\nTECHNIQUE: PA and lateral";
        assert_eq!(
            extract_impression(raw).as_str(),
            "No acute findings. Comparison: prior exam unchanged."
        );
    }

    #[test]
    fn test_stop_word_prefix_requires_colon_or_line_end() {
        // "Findings are stable" 不是段落标题
        let raw = "IMPRESSION:\nFindings are stable.\nEXAM\nCT head";
        assert_eq!(extract_impression(raw).as_str(), "Findings are stable.");
    }

    #[test]
    fn test_impression_runs_to_end_of_text() {
        let raw = "FINDINGS: see below\nIMPRESSION: Small \x07hiatal hernia.";
        assert_eq!(extract_impression(raw).as_str(), "Small hiatal hernia.");
    }

    #[test]
    fn test_reports_without_token_always_empty() {
        let reports = [
            "CLINICAL HISTORY: fall",
            "Impressive study without any header",
            "FINDINGS: 1. one 2. two",
            "conclusion: unremarkable",
        ];
        for raw in reports {
            assert!(extract_impression(raw).is_empty(), "unexpected impression in {:?}", raw);
        }
    }
}
