//! OpenGL 顶点数组
//!
//! 持有一个 VAO 以及挂在它上面的顶点/索引缓冲区。属性槽按添加顺序连续分配，
//! 矩阵类型按列占用多个槽。

use std::rc::Rc;

use crate::core::config::RendererApi;
use crate::core::fatal;
use crate::renderer::buffer::BufferLayout;
use crate::renderer::vertex_array::VertexArray;
use crate::renderer::RendererId;

use super::device::{BufferTarget, GlDevice, GlHandle};

/// OpenGL 顶点数组
pub struct OpenGlVertexArray {
    device: Rc<dyn GlDevice>,
    vao: GlHandle,
    vertex_buffers: Vec<GlHandle>,
    index_buffer: Option<GlHandle>,
    index_count: u32,
    next_attrib: u32,
}

impl OpenGlVertexArray {
    pub fn new(device: Rc<dyn GlDevice>) -> Self {
        let vao = match device.create_vertex_array() {
            Ok(vao) => vao,
            Err(error) => fatal::raise(format!("Failed to create vertex array: {}", error)),
        };

        Self {
            device,
            vao,
            vertex_buffers: Vec::new(),
            index_buffer: None,
            index_count: 0,
            next_attrib: 0,
        }
    }

    /// 已添加的顶点缓冲区数量
    pub fn vertex_buffer_count(&self) -> usize {
        self.vertex_buffers.len()
    }

    fn create_buffer(&self) -> GlHandle {
        match self.device.create_buffer() {
            Ok(buffer) => buffer,
            Err(error) => fatal::raise(format!("Failed to create buffer: {}", error)),
        }
    }
}

impl VertexArray for OpenGlVertexArray {
    fn api(&self) -> RendererApi {
        RendererApi::OpenGl
    }

    fn renderer_id(&self) -> RendererId {
        self.vao
    }

    fn bind(&self) {
        self.device.bind_vertex_array(Some(self.vao));
    }

    fn unbind(&self) {
        self.device.bind_vertex_array(None);
    }

    fn add_vertex_buffer(&mut self, vertices: &[f32], layout: BufferLayout) {
        crate::engine_assert!(!layout.is_empty(), "Vertex buffer has no layout!");

        let buffer = self.create_buffer();
        self.vertex_buffers.push(buffer);

        self.device.bind_vertex_array(Some(self.vao));
        self.device.bind_buffer(BufferTarget::Vertex, Some(buffer));
        self.device
            .buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(vertices));

        let stride = layout.stride() as i32;
        for element in &layout {
            let slot_components = element.data_type.slot_components();
            let slot_size = slot_components * std::mem::size_of::<f32>() as u32;

            for slot in 0..element.data_type.attribute_slots() {
                let index = self.next_attrib;
                self.device.enable_vertex_attrib(index);
                self.device.vertex_attrib_pointer(
                    index,
                    slot_components as i32,
                    element.normalized,
                    stride,
                    (element.offset + slot * slot_size) as i32,
                );
                self.next_attrib += 1;
            }
        }
    }

    fn set_index_buffer(&mut self, indices: &[u32]) {
        if let Some(old) = self.index_buffer.take() {
            self.device.delete_buffer(old);
        }

        let buffer = self.create_buffer();
        self.device.bind_vertex_array(Some(self.vao));
        self.device.bind_buffer(BufferTarget::Index, Some(buffer));
        self.device
            .buffer_data(BufferTarget::Index, bytemuck::cast_slice(indices));

        self.index_buffer = Some(buffer);
        self.index_count = indices.len() as u32;
    }

    fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Drop for OpenGlVertexArray {
    fn drop(&mut self) {
        for buffer in self.vertex_buffers.drain(..) {
            self.device.delete_buffer(buffer);
        }
        if let Some(buffer) = self.index_buffer.take() {
            self.device.delete_buffer(buffer);
        }
        self.device.delete_vertex_array(self.vao);
    }
}
