//! # 报告文本处理模块
//!
//! 从非结构化的放射报告中提取IMPRESSION段落，包括：
//! - 文本规范化：去除控制字符和编码残留，合并空白
//! - 段落提取：以固定的段落标题词表作为截止边界
//! - 列表重排：在顺序编号 ("1.", "2.", ...) 前重新插入换行

pub mod extractor;
pub mod normalizer;
pub mod reflow;

pub use extractor::{extract_impression, SECTION_STOP_WORDS};
pub use normalizer::{collapse_whitespace, normalize};
pub use reflow::reflow_numbered_items;
