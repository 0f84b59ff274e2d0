//! 编号列表重排
//!
//! 合并空白后编号列表挤在一行，这里按顺序编号重新拆成每项一行

/// 在顺序编号 ("1.", "2.", ...) 前插入换行
///
/// 只有文本 (忽略前导空白) 以 "1." 开头时才生效。编号严格按顺序匹配，
/// 后面必须是空白、字母或文本结尾，前面不能是数字，
/// 因此 "2.5 cm"、"12." 这类数值不会被误判为列表项。
pub fn reflow_numbered_items(text: &str) -> String {
    if !text.trim_start().starts_with("1.") {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len() + 8);
    let mut expected_number: u32 = 1;
    let mut marker = String::from("1.");
    let mut position = 0;

    while position < text.len() {
        let rest = &text[position..];

        if rest.starts_with(marker.as_str()) && is_item_marker(text, position, marker.len()) {
            if expected_number > 1 {
                output.truncate(output.trim_end().len());
                output.push('\n');
            }
            output.push_str(&marker);
            position += marker.len();
            expected_number += 1;
            marker = format!("{}.", expected_number);
            continue;
        }

        // rest 非空，必有下一个字符
        if let Some(c) = rest.chars().next() {
            output.push(c);
            position += c.len_utf8();
        }
    }

    output
}

/// 判断 position 处长度为 marker_len 的编号是否为列表项
fn is_item_marker(text: &str, position: usize, marker_len: usize) -> bool {
    let preceded_by_digit = text[..position]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit());
    if preceded_by_digit {
        return false;
    }

    match text[position + marker_len..].chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || c.is_alphabetic(),
    }
}
