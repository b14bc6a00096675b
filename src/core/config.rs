//! 配置管理模块
//!
//! 提供引擎配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! 渲染后端只在这里选择一次，随后由 `ResourceFactory` 持有，
//! 运行期间不会再被修改。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [application]
//! name = "Strata"
//!
//! [graphics]
//! api = "opengl"      # none, opengl, direct3d, vulkan, metal
//! clear_color = [0.1, 0.1, 0.1, 1.0]
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};
use super::math::Color;

/// 引擎配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 应用配置
    #[serde(default)]
    pub application: ApplicationConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// 应用名称（用于日志）
    #[serde(default = "default_name")]
    pub name: String,
}

/// 图形配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 渲染 API 选择
    #[serde(default = "default_api")]
    pub api: RendererApi,

    /// 默认清屏颜色（RGBA，范围 0.0-1.0）
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

/// 渲染 API 类型
///
/// `None` 是合法的配置值，但表示"没有渲染能力"：
/// 在它之上创建任何图形资源都会触发致命断言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererApi {
    /// 无渲染后端
    None,
    /// OpenGL 后端
    #[serde(rename = "opengl")]
    OpenGl,
    /// Direct3D 后端
    Direct3D,
    /// Vulkan 后端
    Vulkan,
    /// Metal 后端
    Metal,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_name() -> String { "Strata".to_string() }
fn default_api() -> RendererApi { RendererApi::OpenGl }
fn default_clear_color() -> [f32; 4] { [0.1, 0.1, 0.1, 1.0] }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "strata.log".to_string() }

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self { name: default_name() }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            clear_color: default_clear_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl GraphicsConfig {
    /// 以 `Color` 形式返回清屏颜色
    pub fn clear_color(&self) -> Color {
        let [r, g, b, a] = self.clear_color;
        Color::new(r, g, b, a)
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use strata_render::core::Config;
    ///
    /// let config = Config::from_file("config.toml").expect("config");
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在或无法解析则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--api <name>`: 按名称选择渲染 API
    /// - `--none` / `--opengl` / `--direct3d` / `--vulkan` / `--metal`: 快捷方式
    /// - `--log-level <level>`: 覆盖日志级别
    ///
    /// 无法识别的值会被忽略，保留原配置。
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        for arg in &args {
            if let Some(api) = arg.strip_prefix("--").and_then(RendererApi::from_name) {
                self.graphics.api = api;
            }
        }

        if let Some(idx) = args.iter().position(|a| a == "--api") {
            if let Some(api) = args.get(idx + 1).and_then(|s| RendererApi::from_name(s)) {
                self.graphics.api = api;
            }
        }

        if let Some(idx) = args.iter().position(|a| a == "--log-level") {
            if let Some(level) = args.get(idx + 1).and_then(|s| LogLevel::from_name(s)) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.application.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "application.name".to_string(),
                reason: "Application name must not be empty".to_string(),
            }
            .into());
        }

        if self
            .graphics
            .clear_color
            .iter()
            .any(|c| !(0.0..=1.0).contains(c))
        {
            return Err(ConfigError::InvalidValue {
                field: "graphics.clear_color".to_string(),
                reason: "Color components must be within [0.0, 1.0]".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl RendererApi {
    /// 所有已声明的 API 变体
    pub const ALL: [RendererApi; 5] = [
        RendererApi::None,
        RendererApi::OpenGl,
        RendererApi::Direct3D,
        RendererApi::Vulkan,
        RendererApi::Metal,
    ];

    /// 从名称解析（不区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(RendererApi::None),
            "opengl" | "gl" => Some(RendererApi::OpenGl),
            "direct3d" | "d3d" | "dx" => Some(RendererApi::Direct3D),
            "vulkan" | "vk" => Some(RendererApi::Vulkan),
            "metal" => Some(RendererApi::Metal),
            _ => None,
        }
    }

    /// 获取后端名称
    pub fn name(&self) -> &'static str {
        match self {
            RendererApi::None => "None",
            RendererApi::OpenGl => "OpenGL",
            RendererApi::Direct3D => "Direct3D",
            RendererApi::Vulkan => "Vulkan",
            RendererApi::Metal => "Metal",
        }
    }

    /// 是否具备渲染能力
    pub fn is_none(&self) -> bool {
        matches!(self, RendererApi::None)
    }
}

impl LogLevel {
    /// 从名称解析（不区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}
