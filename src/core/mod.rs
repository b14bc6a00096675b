//! 核心功能模块
//!
//! 本模块提供了引擎的基础功能，这些模块独立于具体的图形 API。
//!
//! # 模块组织
//!
//! - `math`：基于 nalgebra 的向量、矩阵与颜色
//! - `log`：日志系统（引擎与应用两个通道）
//! - `config`：配置管理，渲染 API 在这里选定
//! - `error`：可恢复错误的统一类型
//! - `fatal`：不可恢复错误的致命断言
//! - `event`：事件与事件分发器
//! - `time`：帧时间
//! - `layer` / `layer_stack`：层与层栈
//! - `application`：把以上部件组装在一起的应用

pub mod application;
pub mod config;
pub mod error;
pub mod event;
pub mod fatal;
pub mod layer;
pub mod layer_stack;
pub mod log;
pub mod math;
pub mod time;

// 重新导出常用类型，方便使用
pub use application::Application;
pub use config::{Config, LogLevel, RendererApi};
pub use error::{ConfigError, GraphicsError, Result, StrataError};
pub use event::{
    Event, EventDispatcher, EventType, KeyCode, KeyboardEvent, MouseButton,
    MouseButtonEvent, MouseMoveEvent, MouseScrollEvent, WindowCloseEvent,
    WindowResizeEvent,
};
pub use fatal::FatalError;
pub use layer::{Layer, LayerId};
pub use layer_stack::LayerStack;
pub use math::{Color, Matrix4, Vector3, Vector4};
pub use time::Timestep;
