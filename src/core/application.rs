//! 应用
//!
//! `Application` 持有配置、渲染器与层栈，把窗口事件路由到层栈，
//! 并驱动每一帧的清屏、更新与渲染。窗口与事件循环由宿主负责，
//! 宿主只需要转发事件并按帧调用 [`Application::run_frame`]。
//!
//! # 示例
//!
//! ```ignore
//! let mut config = Config::from_file_or_default("config.toml");
//! config.apply_args(std::env::args());
//!
//! let mut app = Application::new(config, opengl_factory(device))?;
//! app.push_layer(Box::new(GameLayer::default()));
//!
//! while app.run_frame(clock.tick()) {
//!     for mut event in window.poll_events() {
//!         app.on_event(event.as_mut());
//!     }
//! }
//! ```

use crate::core::config::Config;
use crate::core::error::{GraphicsError, Result};
use crate::core::event::{Event, EventDispatcher, EventType};
use crate::core::layer::{Layer, LayerId};
use crate::core::layer_stack::LayerStack;
use crate::core::time::Timestep;
use crate::renderer::factory::ResourceFactory;
use crate::renderer::Renderer;

/// 应用
pub struct Application {
    // 层先于渲染器销毁
    layers: LayerStack,
    renderer: Renderer,
    config: Config,
    running: bool,
    frame_count: u64,
    elapsed: f32,
}

impl Application {
    /// 创建应用
    ///
    /// 校验配置，并要求工厂面向的渲染 API 与配置选择的一致。
    pub fn new(config: Config, factory: ResourceFactory) -> Result<Self> {
        config.validate()?;

        if factory.api() != config.graphics.api {
            return Err(GraphicsError::ApiMismatch {
                factory: factory.api(),
                configured: config.graphics.api,
            }
            .into());
        }

        let renderer = Renderer::new(factory, config.graphics.clear_color())?;

        crate::engine_info!(
            name = %config.application.name,
            api = config.graphics.api.name(),
            "Application initialized"
        );

        Ok(Self {
            layers: LayerStack::new(),
            renderer,
            config,
            running: true,
            frame_count: 0,
            elapsed: 0.0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn push_layer(&mut self, layer: Box<dyn Layer>) -> LayerId {
        self.layers.push_layer(layer)
    }

    pub fn push_overlay(&mut self, layer: Box<dyn Layer>) -> LayerId {
        self.layers.push_overlay(layer)
    }

    pub fn pop_layer(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        self.layers.pop_layer(id)
    }

    pub fn pop_overlay(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        self.layers.pop_overlay(id)
    }

    /// 处理一个事件
    ///
    /// 窗口关闭事件由应用自身处理并停止运行；其余事件自顶向下交给层栈。
    /// 返回事件是否已被处理。
    pub fn on_event(&mut self, event: &mut dyn Event) -> bool {
        crate::engine_trace!(event = %event.detail(), "Event received");

        let mut dispatcher = EventDispatcher::new(event);
        let running = &mut self.running;
        if dispatcher.dispatch(EventType::WindowClose, |_| {
            *running = false;
            true
        }) {
            crate::engine_info!("Window close requested, stopping application");
            return true;
        }

        self.layers.on_event(event)
    }

    /// 执行一帧：清屏，然后按层栈顺序更新并渲染所有层
    ///
    /// 返回应用在这一帧之后是否仍在运行；已停止的应用不做任何事。
    pub fn run_frame(&mut self, delta_seconds: f32) -> bool {
        if !self.running {
            return false;
        }

        let timestep = Timestep::new(delta_seconds);
        self.elapsed += delta_seconds;

        self.renderer.clear();
        self.layers.update(timestep);
        self.layers.render(&mut self.renderer);

        self.frame_count += 1;
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 请求在当前帧结束后停止
    pub fn close(&mut self) {
        self.running = false;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// 自启动以来累计的帧时间（秒）
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
