//! # PACS管理模块
//!
//! 提供修正规则的导入导出、规则编辑存储、配置管理和日志初始化等功能

pub mod config;
pub mod logging;
pub mod rule_book;
pub mod rules;

pub use config::{ConfigManager, EngineConfig, ImpressionConfig, LoggingConfig, RulesConfig};
pub use logging::init_logging;
pub use rule_book::{RuleBook, RuleDraft};
pub use rules::{
    backup_rule_set, export_rule_set, load_rule_set, parse_rule_set, save_rule_set, RuleRecord,
    RuleSetDocument,
};
