//! 事件系统模块
//!
//! 事件从应用层进入层栈，自顶向下（先覆盖层，后普通层）依次交给每一层，
//! 一旦某层将事件标记为已处理，传递即停止。
//!
//! # 使用示例
//!
//! ```
//! use strata_render::core::event::*;
//!
//! let mut event = WindowResizeEvent::new(1920, 1080);
//! let mut dispatcher = EventDispatcher::new(&mut event);
//!
//! dispatcher.dispatch(EventType::WindowResize, |e| {
//!     println!("窗口调整为: {}", e.detail());
//!     true
//! });
//!
//! assert!(dispatcher.is_handled());
//! ```

use std::fmt;

/// 事件类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// 空事件（占位，不应被分发）
    None,
    WindowResize,
    WindowClose,
    MouseButtonDown,
    MouseButtonUp,
    MouseMove,
    MouseScroll,
    KeyDown,
    KeyUp,
}

impl EventType {
    /// 事件类型名称，用于日志记录和调试
    pub fn name(&self) -> &'static str {
        match self {
            EventType::None => "None",
            EventType::WindowResize => "WindowResize",
            EventType::WindowClose => "WindowClose",
            EventType::MouseButtonDown => "MouseButtonDown",
            EventType::MouseButtonUp => "MouseButtonUp",
            EventType::MouseMove => "MouseMove",
            EventType::MouseScroll => "MouseScroll",
            EventType::KeyDown => "KeyDown",
            EventType::KeyUp => "KeyUp",
        }
    }
}

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// 额外按钮（如侧键），编号通常从 3 开始
    Other(u8),
}

/// 键盘按键（简化版本）
///
/// 只列出常用按键，其他按键使用 `Other` 携带平台相关的虚拟键码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Space,
    Escape,
    Enter,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Other(u32),
}

/// 事件 trait
///
/// 所有事件都必须实现此 trait。`is_handled` 为 `true` 的事件不会继续向下层传递。
///
/// # 示例
///
/// ```
/// use strata_render::core::event::{Event, EventType};
///
/// #[derive(Debug)]
/// struct MyCustomEvent {
///     handled: bool,
/// }
///
/// impl Event for MyCustomEvent {
///     fn event_type(&self) -> EventType {
///         EventType::None
///     }
///
///     fn is_handled(&self) -> bool {
///         self.handled
///     }
///
///     fn set_handled(&mut self, handled: bool) {
///         self.handled = handled;
///     }
/// }
/// ```
pub trait Event: fmt::Debug {
    /// 事件类型标识，供分发器进行类型检查
    fn event_type(&self) -> EventType;

    /// 人类可读的事件描述（默认使用 `Debug` 输出）
    fn detail(&self) -> String {
        format!("{:?}", self)
    }

    /// 事件是否已被处理
    fn is_handled(&self) -> bool;

    /// 设置事件处理状态
    fn set_handled(&mut self, handled: bool);
}

macro_rules! impl_handled {
    () => {
        fn is_handled(&self) -> bool {
            self.handled
        }

        fn set_handled(&mut self, handled: bool) {
            self.handled = handled;
        }
    };
}

/// 窗口调整大小事件
#[derive(Debug, Clone)]
pub struct WindowResizeEvent {
    /// 新的客户区宽度（像素）
    pub width: u32,
    /// 新的客户区高度（像素）
    pub height: u32,
    handled: bool,
}

impl WindowResizeEvent {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            handled: false,
        }
    }
}

impl Event for WindowResizeEvent {
    fn event_type(&self) -> EventType {
        EventType::WindowResize
    }

    fn detail(&self) -> String {
        format!("WindowResize: {}x{}", self.width, self.height)
    }

    impl_handled!();
}

/// 窗口关闭事件
#[derive(Debug, Clone, Default)]
pub struct WindowCloseEvent {
    handled: bool,
}

impl WindowCloseEvent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Event for WindowCloseEvent {
    fn event_type(&self) -> EventType {
        EventType::WindowClose
    }

    fn detail(&self) -> String {
        "WindowClose".to_string()
    }

    impl_handled!();
}

/// 鼠标按钮事件（按下或释放）
#[derive(Debug, Clone)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    /// 光标位置（窗口坐标）
    pub x: f32,
    pub y: f32,
    /// `true` 为按下，`false` 为释放
    pub pressed: bool,
    handled: bool,
}

impl MouseButtonEvent {
    pub fn pressed(button: MouseButton, x: f32, y: f32) -> Self {
        Self {
            button,
            x,
            y,
            pressed: true,
            handled: false,
        }
    }

    pub fn released(button: MouseButton, x: f32, y: f32) -> Self {
        Self {
            pressed: false,
            ..Self::pressed(button, x, y)
        }
    }
}

impl Event for MouseButtonEvent {
    fn event_type(&self) -> EventType {
        if self.pressed {
            EventType::MouseButtonDown
        } else {
            EventType::MouseButtonUp
        }
    }

    fn detail(&self) -> String {
        format!(
            "{}: {:?} at ({}, {})",
            self.event_type().name(),
            self.button,
            self.x,
            self.y
        )
    }

    impl_handled!();
}

/// 鼠标移动事件
#[derive(Debug, Clone)]
pub struct MouseMoveEvent {
    pub x: f32,
    pub y: f32,
    /// 相对上一次移动的增量
    pub delta_x: f32,
    pub delta_y: f32,
    handled: bool,
}

impl MouseMoveEvent {
    pub fn new(x: f32, y: f32, delta_x: f32, delta_y: f32) -> Self {
        Self {
            x,
            y,
            delta_x,
            delta_y,
            handled: false,
        }
    }
}

impl Event for MouseMoveEvent {
    fn event_type(&self) -> EventType {
        EventType::MouseMove
    }

    fn detail(&self) -> String {
        format!(
            "MouseMove: ({}, {}) delta ({}, {})",
            self.x, self.y, self.delta_x, self.delta_y
        )
    }

    impl_handled!();
}

/// 鼠标滚轮事件
#[derive(Debug, Clone)]
pub struct MouseScrollEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    handled: bool,
}

impl MouseScrollEvent {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            handled: false,
        }
    }
}

impl Event for MouseScrollEvent {
    fn event_type(&self) -> EventType {
        EventType::MouseScroll
    }

    fn detail(&self) -> String {
        format!("MouseScroll: ({}, {})", self.delta_x, self.delta_y)
    }

    impl_handled!();
}

/// 键盘事件（按下或释放）
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub key_code: KeyCode,
    pub pressed: bool,
    handled: bool,
}

impl KeyboardEvent {
    pub fn pressed(key_code: KeyCode) -> Self {
        Self {
            key_code,
            pressed: true,
            handled: false,
        }
    }

    pub fn released(key_code: KeyCode) -> Self {
        Self {
            pressed: false,
            ..Self::pressed(key_code)
        }
    }
}

impl Event for KeyboardEvent {
    fn event_type(&self) -> EventType {
        if self.pressed {
            EventType::KeyDown
        } else {
            EventType::KeyUp
        }
    }

    fn detail(&self) -> String {
        format!("{}: {:?}", self.event_type().name(), self.key_code)
    }

    impl_handled!();
}

/// 事件分发器
///
/// 只有当事件类型与期望类型一致时才调用处理函数，处理函数的返回值
/// 会写回事件的处理状态。
pub struct EventDispatcher<'a> {
    event: &'a mut dyn Event,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(event: &'a mut dyn Event) -> Self {
        Self { event }
    }

    /// 分发事件到处理函数
    ///
    /// # 返回值
    ///
    /// - `true`: 事件类型匹配且处理函数返回 true
    /// - `false`: 事件类型不匹配或处理函数返回 false
    pub fn dispatch<F>(&mut self, event_type: EventType, mut handler: F) -> bool
    where
        F: FnMut(&mut dyn Event) -> bool,
    {
        if self.event.event_type() == event_type {
            let handled = handler(&mut *self.event);
            self.event.set_handled(handled);
            handled
        } else {
            false
        }
    }

    pub fn is_handled(&self) -> bool {
        self.event.is_handled()
    }
}
