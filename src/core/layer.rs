//! 层
//!
//! 层是应用中可独立开关的一片逻辑（游戏世界、调试面板、HUD 等）。
//! 层栈拥有压入的层；每帧按自底向上的顺序更新与渲染，
//! 事件则自顶向下传递。
//!
//! 除 `name` 外所有回调都有空的默认实现。

use std::fmt;

use crate::core::event::Event;
use crate::core::time::Timestep;
use crate::renderer::Renderer;

/// 层 trait
pub trait Layer {
    /// 调试名称
    fn name(&self) -> &str;

    /// 压入层栈时调用
    fn on_attach(&mut self) {}

    /// 从层栈弹出或层栈销毁时调用
    fn on_detach(&mut self) {}

    /// 每帧更新
    fn on_update(&mut self, _timestep: Timestep) {}

    /// 每帧渲染
    fn on_render(&mut self, _renderer: &mut Renderer) {}

    /// 处理事件，返回 `true` 表示事件已被消费，不再向下层传递
    fn on_event(&mut self, _event: &mut dyn Event) -> bool {
        false
    }
}

/// 层在层栈中的标识，压入时分配，在同一层栈内唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
