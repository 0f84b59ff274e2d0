//! 错误定义模块

use thiserror::Error;
use uuid::Uuid;

/// PACS系统统一错误类型
#[derive(Error, Debug)]
pub enum PacsError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("规则ID重复: {0}")]
    DuplicateRule(Uuid),

    #[error("无效日期: {0}")]
    InvalidDate(String),
}

/// PACS系统统一结果类型
pub type Result<T> = std::result::Result<T, PacsError>;
