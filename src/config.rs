//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的配置结构和解析逻辑。

use crate::error::{CacheError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_VERSION: u32 = 1;

lazy_static! {
    static ref SERVICE_NAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9_-]+$").expect("service name pattern is valid");
}

/// 缓存配置
///
/// 缓存没有过期时钟，因此这里没有任何 TTL 设置
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeoCacheConfig {
    #[serde(default)]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub warmup: WarmupConfig,
}

/// 全局配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GlobalConfig {
    /// 服务名称，用于指标标签和日志
    pub service_name: String,
    /// 是否启用指标收集
    pub enable_metrics: bool,
    /// 日志过滤表达式（RUST_LOG 优先）
    pub log_filter: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            service_name: "geocache".to_string(),
            enable_metrics: true,
            log_filter: "info".to_string(),
        }
    }
}

/// 缓存预热配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WarmupConfig {
    /// 是否启用预热
    pub enabled: bool,
    /// 预热超时时间（秒）
    pub timeout_seconds: u64,
    /// 需要预加载子区域列表的大区ID
    pub region_ids: Vec<String>,
    /// 需要预加载地点列表的子区域ID
    pub sub_region_ids: Vec<String>,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_seconds: 30,
            region_ids: Vec::new(),
            sub_region_ids: Vec::new(),
        }
    }
}

impl GeoCacheConfig {
    /// 从TOML字符串解析并校验配置
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: GeoCacheConfig = toml::from_str(s)?;
        config.validate().map_err(CacheError::ConfigError)?;
        Ok(config)
    }

    /// 从TOML文件加载并校验配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有值在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = self.config_version {
            if version > CONFIG_VERSION {
                return Err(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                ));
            }
        }

        let name = &self.global.service_name;
        if name.is_empty() {
            return Err("Service name cannot be empty".to_string());
        }

        if name.len() > 64 {
            return Err(format!(
                "Service name '{}' exceeds maximum length of 64 characters",
                name
            ));
        }

        // 服务名会出现在指标键中，键以 ':' 分隔
        if !SERVICE_NAME_PATTERN.is_match(name) {
            return Err(format!(
                "Service name '{}' may only contain letters, digits, '_' and '-'",
                name
            ));
        }

        if self.warmup.enabled && !(1..=3600).contains(&self.warmup.timeout_seconds) {
            return Err("Warmup timeout_seconds must be between 1 and 3600 seconds".to_string());
        }

        if self.warmup.region_ids.iter().any(|id| id.is_empty()) {
            return Err("Warmup region_ids cannot contain empty ids".to_string());
        }

        if self.warmup.sub_region_ids.iter().any(|id| id.is_empty()) {
            return Err("Warmup sub_region_ids cannot contain empty ids".to_string());
        }

        Ok(())
    }
}
