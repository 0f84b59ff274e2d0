//! 文本规范化
//!
//! 去除编码残留 (智能引号、控制字节等)，保留有临床意义的标点

/// 合并空白：所有 CR/LF/TAB/空格 序列替换为单个空格，并去除首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 规范化文本
///
/// - 其他空白和控制字符替换为空格
/// - 丢弃字母、数字、ASCII标点和空格以外的字符
/// - 合并连续空格并去除首尾空白
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let filtered: String = text
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() || c.is_control() {
                Some(' ')
            } else if c.is_alphanumeric() || c.is_ascii_punctuation() {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    collapse_whitespace(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize("\x00\x01\x02"), "");
    }

    #[test]
    fn test_control_characters_become_spaces() {
        assert_eq!(normalize("Normal\x0bstudy"), "Normal study");
        assert_eq!(normalize("No\r\nacute\tdisease"), "No acute disease");
    }

    #[test]
    fn test_smart_quotes_dropped() {
        assert_eq!(normalize("\u{201C}stable\u{201D} nodule"), "stable nodule");
        assert_eq!(normalize("patient\u{2019}s"), "patients");
    }

    #[test]
    fn test_clinical_punctuation_preserved() {
        let text = "2.5 cm nodule (right upper lobe); f/u in 3-6 months, per Fleischner's criteria.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_non_ascii_letters_preserved() {
        assert_eq!(normalize("Résultat élevé"), "Résultat élevé");
    }

    #[test]
    fn test_collapse_and_trim() {
        assert_eq!(normalize("   a    b  \u{00A0} c   "), "a b c");
        assert_eq!(collapse_whitespace("\n\n one \r\n\ttwo  "), "one two");
    }
}
