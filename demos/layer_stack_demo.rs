//! 层栈演示
//!
//! 不需要 GPU：演示普通层与覆盖层的顺序、事件自顶向下的传递，
//! 以及资源工厂在没有注册后端时的行为。
//!
//! ```bash
//! cargo run --example layer_stack_demo -- --vulkan --log-level debug
//! ```

use strata_render::core::event::{
    Event, EventDispatcher, EventType, KeyCode, KeyboardEvent, MouseButton, MouseButtonEvent,
};
use strata_render::core::log;
use strata_render::core::{Color, Config, Layer, LayerStack, Timestep};
use strata_render::renderer::{Renderer, ResourceFactory};
use strata_render::{app_info, app_warn};

struct NamedLayer {
    name: &'static str,
    /// 只消费这种事件
    consumes: Option<EventType>,
    frames: u32,
}

impl NamedLayer {
    fn new(name: &'static str, consumes: Option<EventType>) -> Self {
        Self {
            name,
            consumes,
            frames: 0,
        }
    }
}

impl Layer for NamedLayer {
    fn name(&self) -> &str {
        self.name
    }

    fn on_attach(&mut self) {
        app_info!(layer = self.name, "attached");
    }

    fn on_detach(&mut self) {
        app_info!(layer = self.name, frames = self.frames, "detached");
    }

    fn on_update(&mut self, _timestep: Timestep) {
        self.frames += 1;
    }

    fn on_event(&mut self, event: &mut dyn Event) -> bool {
        let Some(wanted) = self.consumes else {
            app_info!(layer = self.name, event = %event.detail(), "ignored");
            return false;
        };

        let name = self.name;
        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch(wanted, |e| {
            app_info!(layer = name, event = %e.detail(), "handled");
            true
        })
    }
}

fn main() -> anyhow::Result<()> {
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args());
    config.validate()?;

    log::init_logger(config.logging.level, false, None)?;
    app_info!(name = %config.application.name, "Layer stack demo starting");

    let mut stack = LayerStack::new();
    stack.push_layer(Box::new(NamedLayer::new("World", Some(EventType::KeyDown))));
    stack.push_overlay(Box::new(NamedLayer::new("DebugOverlay", Some(EventType::MouseButtonDown))));
    stack.push_layer(Box::new(NamedLayer::new("Ui", None)));

    let order: Vec<&str> = stack.iter().map(|(_, layer)| layer.name()).collect();
    app_info!(?order, "Stack order (bottom to top)");

    for _ in 0..3 {
        stack.update(Timestep::new(1.0 / 60.0));
    }

    let mut click = MouseButtonEvent::pressed(MouseButton::Left, 10.0, 20.0);
    stack.on_event(&mut click);

    let mut key = KeyboardEvent::pressed(KeyCode::Space);
    stack.on_event(&mut key);

    // 演示进程中没有 GL 上下文，因此不注册任何后端
    let factory = ResourceFactory::new(config.graphics.api);
    if config.graphics.api.is_none() {
        app_warn!("RendererApi::None selected, skipping renderer creation");
    } else if let Err(e) = Renderer::new(factory, Color::BLACK) {
        app_warn!(error = %e, "No renderer for the configured API");
    }

    Ok(())
}
