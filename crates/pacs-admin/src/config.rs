//! 配置管理
//!
//! 提供统一的配置管理功能，支持配置文件、环境变量覆盖和验证

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// 环境变量前缀，例如 PACS_LOGGING__LEVEL
pub const ENV_PREFIX: &str = "PACS";

/// 支持的日志格式
pub const LOG_FORMATS: [&str; 3] = ["compact", "full", "pretty"];

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    /// 配置数据
    config: Arc<RwLock<ImpressionConfig>>,
    /// 配置文件路径
    config_path: Option<String>,
    /// 环境变量前缀
    env_prefix: &'static str,
    /// 配置验证器
    validator: ConfigValidator,
}

/// 印象引擎完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpressionConfig {
    /// 日志配置
    pub logging: LoggingConfig,
    /// 规则配置
    pub rules: RulesConfig,
    /// 引擎配置
    pub engine: EngineConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (EnvFilter 语法)
    pub level: String,
    /// 日志格式
    pub format: String,
}

/// 规则配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// 规则文件
    pub rules_file: String,
    /// 备份目录
    pub backup_dir: String,
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 启用修正规则
    pub fixers_enabled: bool,
}

/// 配置验证器
#[derive(Debug)]
pub struct ConfigValidator {
    /// 验证规则
    validation_rules: Vec<ValidationRule>,
}

/// 验证规则
#[derive(Debug)]
struct ValidationRule {
    /// 字段路径
    field_path: &'static str,
    /// 验证函数
    validator: fn(&ImpressionConfig) -> Result<()>,
    /// 错误消息
    error_message: &'static str,
}

impl ConfigManager {
    /// 加载配置，未指定路径或文件不存在时使用默认值和环境变量
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with_env_prefix(config_path, ENV_PREFIX)
    }

    fn load_with_env_prefix(config_path: Option<&str>, env_prefix: &'static str) -> Result<Self> {
        let config = Self::load_config(config_path, env_prefix)?;
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: config_path.map(str::to_string),
            env_prefix,
            validator,
        })
    }

    /// 从文件和环境变量加载配置，环境变量优先
    fn load_config(config_path: Option<&str>, env_prefix: &str) -> Result<ImpressionConfig> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: ImpressionConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        match config_path {
            Some(path) => info!("Configuration loaded from: {}", path),
            None => debug!("No configuration file given, using defaults"),
        }
        Ok(config)
    }

    /// 获取配置
    pub async fn get_config(&self) -> ImpressionConfig {
        let config = self.config.read().await;
        config.clone()
    }

    /// 更新配置
    pub async fn update_config(&self, new_config: ImpressionConfig) -> Result<()> {
        self.validator.validate(&new_config)?;

        {
            let mut config = self.config.write().await;
            *config = new_config;
        }

        info!("Configuration updated successfully");
        Ok(())
    }

    /// 保存配置到文件 (TOML)
    pub async fn save_config(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config = self.config.read().await;
        let config_str = toml::to_string_pretty(&*config)
            .context("Failed to serialize configuration")?;

        tokio::fs::write(path, config_str)
            .await
            .with_context(|| format!("Failed to write configuration file {:?}", path))?;

        info!("Configuration saved to: {:?}", path);
        Ok(())
    }

    /// 重新加载配置，验证失败时保留当前配置
    pub async fn reload_config(&self) -> Result<()> {
        let new_config = Self::load_config(self.config_path.as_deref(), self.env_prefix)?;
        self.update_config(new_config).await
    }
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "logging.level",
                validator: |config| {
                    EnvFilter::try_new(&config.logging.level)
                        .map(|_| ())
                        .map_err(|e| anyhow::anyhow!("Unparseable log level {:?}: {}", config.logging.level, e))
                },
                error_message: "Invalid log level",
            },
            ValidationRule {
                field_path: "logging.format",
                validator: |config| {
                    if LOG_FORMATS.contains(&config.logging.format.as_str()) {
                        Ok(())
                    } else {
                        Err(anyhow::anyhow!(
                            "Log format must be one of {:?}, got {:?}",
                            LOG_FORMATS,
                            config.logging.format
                        ))
                    }
                },
                error_message: "Invalid log format",
            },
            ValidationRule {
                field_path: "rules.rules_file",
                validator: |config| {
                    if config.rules.rules_file.trim().is_empty() {
                        Err(anyhow::anyhow!("Rules file path cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid rules file",
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &ImpressionConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("{}: {}", rule.error_message, e));
            }
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rules_file: "./config/fixer_rules.json".to_string(),
            backup_dir: "./backups".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixers_enabled: true,
        }
    }
}
