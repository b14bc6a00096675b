//! OpenGL 后端
//!
//! 所有 GL 调用都经过 [`GlDevice`]，因此着色器、顶点数组与渲染后端都不直接依赖
//! 具体的 GL 加载器。桌面平台上使用基于 glow 的 [`GlowDevice`](glow_device::GlowDevice)。
//!
//! # 示例
//!
//! ```ignore
//! let device = Rc::new(unsafe { GlowDevice::new(gl) });
//! let factory = opengl_factory(device);
//! let renderer = Renderer::new(factory, Color::BLACK)?;
//! ```

use std::rc::Rc;

use crate::core::config::RendererApi;
use crate::core::math::Color;
use crate::renderer::factory::{BackendProvider, ResourceFactory};
use crate::renderer::shader::Shader;
use crate::renderer::vertex_array::VertexArray;
use crate::renderer::RendererBackend;

pub mod backend;
pub mod device;
#[cfg(not(target_arch = "wasm32"))]
pub mod glow_device;
pub mod shader;
pub mod vertex_array;

pub use backend::OpenGlRendererBackend;
pub use device::{BufferTarget, GlDevice, GlHandle};
pub use shader::OpenGlShader;
pub use vertex_array::OpenGlVertexArray;

/// OpenGL 资源构造器
///
/// 所有资源共享同一个设备，设备必须属于当前线程的 GL 上下文。
#[derive(Clone)]
pub struct OpenGlProvider {
    device: Rc<dyn GlDevice>,
}

impl OpenGlProvider {
    pub fn new(device: Rc<dyn GlDevice>) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Rc<dyn GlDevice> {
        &self.device
    }
}

impl BackendProvider for OpenGlProvider {
    fn create_renderer_backend(&self, clear_color: Color) -> Box<dyn RendererBackend> {
        Box::new(OpenGlRendererBackend::new(self.device.clone(), clear_color))
    }

    fn create_vertex_array(&self) -> Box<dyn VertexArray> {
        Box::new(OpenGlVertexArray::new(self.device.clone()))
    }

    fn create_shader(&self, vertex_src: &str, fragment_src: &str) -> Box<dyn Shader> {
        Box::new(OpenGlShader::new(self.device.clone(), vertex_src, fragment_src))
    }
}

/// 创建以 OpenGL 为当前 API、并已注册 OpenGL 后端的工厂
pub fn opengl_factory(device: Rc<dyn GlDevice>) -> ResourceFactory {
    ResourceFactory::new(RendererApi::OpenGl).with_provider(RendererApi::OpenGl, OpenGlProvider::new(device))
}
