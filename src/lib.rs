//! Strata - 后端无关的渲染核心
//!
//! Strata 将"画什么、按什么顺序画"与"由哪个图形 API 来画"解耦。
//! 本库提供层栈（LayerStack）、渲染后端抽象以及按后端分发的资源工厂。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理、致命断言、事件、层系统、应用）
//! - `renderer`: 与图形 API 无关的渲染接口（后端 trait、资源工厂、着色器、顶点数组、相机）
//! - `gfx`: 具体图形后端实现（目前为 OpenGL）
//!
//! # 使用示例
//!
//! ```no_run
//! use strata_render::core::layer::Layer;
//! use strata_render::core::layer_stack::LayerStack;
//!
//! struct GameLayer;
//!
//! impl Layer for GameLayer {
//!     fn name(&self) -> &str {
//!         "Game"
//!     }
//! }
//!
//! let mut stack = LayerStack::new();
//! let id = stack.push_layer(Box::new(GameLayer));
//! assert!(stack.contains(id));
//! ```

pub mod core;
pub mod gfx;
pub mod renderer;

#[cfg(test)]
pub(crate) mod testing;
