//! OpenGL 渲染后端

use std::rc::Rc;

use crate::core::config::RendererApi;
use crate::core::math::Color;
use crate::renderer::vertex_array::VertexArray;
use crate::renderer::RendererBackend;

use super::device::GlDevice;

/// OpenGL 渲染后端
pub struct OpenGlRendererBackend {
    device: Rc<dyn GlDevice>,
    /// `clear()` 使用的颜色
    default_clear: Color,
}

impl OpenGlRendererBackend {
    pub fn new(device: Rc<dyn GlDevice>, default_clear: Color) -> Self {
        Self {
            device,
            default_clear,
        }
    }

    pub fn default_clear_color(&self) -> Color {
        self.default_clear
    }
}

impl RendererBackend for OpenGlRendererBackend {
    fn api(&self) -> RendererApi {
        RendererApi::OpenGl
    }

    fn clear(&mut self) {
        self.clear_with_color(self.default_clear);
    }

    fn clear_with_color(&mut self, color: Color) {
        self.device.clear_color(color);
        self.device.clear();
    }

    fn draw_indexed(&mut self, vertex_array: &Rc<dyn VertexArray>) {
        crate::engine_assert!(
            vertex_array.api() == RendererApi::OpenGl,
            "Vertex array was created by the {} backend",
            vertex_array.api().name()
        );

        vertex_array.bind();
        self.device
            .draw_indexed_triangles(vertex_array.index_count() as i32);
    }
}
