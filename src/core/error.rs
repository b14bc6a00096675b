//! 错误处理模块
//!
//! 定义了引擎中可恢复错误的统一类型，使用 `thiserror` 提供错误消息。
//!
//! 不可恢复的错误（着色器编译失败、在 `None` 后端上创建资源等）不走这里，
//! 而是通过 [`crate::core::fatal`] 直接终止执行。

use thiserror::Error;

use super::config::RendererApi;

/// 引擎统一的 Result 类型
pub type Result<T> = std::result::Result<T, StrataError>;

/// Strata 引擎的错误类型
#[derive(Debug, Error)]
pub enum StrataError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 图形 API 错误
    #[error("Graphics error: {0}")]
    Graphics(#[from] GraphicsError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 日志系统错误
    #[error("Log error: {0}")]
    Log(String),

    /// 初始化错误
    #[error("Initialization error: {0}")]
    Initialization(String),
}

/// 配置相关的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件未找到
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// 配置值无效
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// 当前资源工厂没有注册该后端
    #[error("Renderer API {0:?} has no registered backend")]
    UnsupportedApi(RendererApi),

    /// 资源工厂的后端与配置不一致
    #[error("Resource factory targets {factory:?} but the configuration selects {configured:?}")]
    ApiMismatch {
        factory: RendererApi,
        configured: RendererApi,
    },
}
