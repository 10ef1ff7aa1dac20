//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了参考数据缓存的错误类型。

use thiserror::Error;

/// 传输层错误
///
/// 网络或服务端失败，携带可选的可读消息。
/// 缓存对该错误完全透明：同一次在途请求的所有等待者收到相同的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transport error: {}", .message.as_deref().unwrap_or("no details"))]
pub struct TransportError {
    /// 可读的错误消息
    pub message: Option<String>,
}

impl TransportError {
    /// 创建带消息的传输错误
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// 创建不带消息的传输错误
    pub fn unspecified() -> Self {
        Self { message: None }
    }
}

/// 缓存系统错误类型枚举
///
/// 覆盖配置加载和初始化阶段的错误；读取路径只会产生 [`TransportError`]
#[derive(Error, Debug)]
pub enum CacheError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML解析错误
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// 传输层错误
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// 缓存操作结果类型别名
pub type Result<T> = std::result::Result<T, CacheError>;

/// 读取或写入传输层的结果类型别名
pub type FetchResult<T> = std::result::Result<T, TransportError>;
