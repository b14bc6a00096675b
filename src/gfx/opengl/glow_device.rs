//! 基于 `glow` 的 `GlDevice` 实现

use std::num::NonZeroU32;

use glow::HasContext;

use super::device::{BufferTarget, GlDevice, GlHandle};
use crate::core::math::Color;
use crate::renderer::shader::ShaderStage;

/// 包装 `glow::Context` 的 OpenGL 设备
///
/// 上下文由宿主（窗口系统）创建并在渲染线程上保持为当前上下文。
///
/// ```no_run
/// use std::rc::Rc;
///
/// use strata_render::core::Color;
/// use strata_render::gfx::opengl::glow_device::GlowDevice;
/// use strata_render::gfx::opengl_factory;
/// use strata_render::renderer::Renderer;
///
/// # fn get_proc_address(_name: &str) -> *const std::ffi::c_void { std::ptr::null() }
/// # fn main() -> strata_render::core::Result<()> {
/// let gl = unsafe { glow::Context::from_loader_function(get_proc_address) };
/// let device = Rc::new(unsafe { GlowDevice::new(gl) });
///
/// let mut renderer = Renderer::new(opengl_factory(device), Color::BLACK)?;
/// renderer.clear();
/// # Ok(())
/// # }
/// ```
pub struct GlowDevice {
    gl: glow::Context,
}

impl GlowDevice {
    /// 包装一个已创建的 GL 上下文
    ///
    /// # Safety
    ///
    /// `gl` 必须是有效的 OpenGL 3.3+ 上下文，并且在此设备的整个生命周期内
    /// 都是调用线程上的当前上下文。
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// 获取底层 glow 上下文
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }
}

fn program(id: GlHandle) -> Option<glow::NativeProgram> {
    NonZeroU32::new(id).map(glow::NativeProgram)
}

fn shader(id: GlHandle) -> Option<glow::NativeShader> {
    NonZeroU32::new(id).map(glow::NativeShader)
}

fn vertex_array(id: GlHandle) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id).map(glow::NativeVertexArray)
}

fn buffer(id: GlHandle) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id).map(glow::NativeBuffer)
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

// SAFETY（本 impl 中所有 unsafe 块）：`GlowDevice::new` 的调用方保证上下文有效且为当前上下文，
// 传入的句柄都由同一上下文分配。
impl GlDevice for GlowDevice {
    fn create_program(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_program() }.map(|p| p.0.get())
    }

    fn delete_program(&self, id: GlHandle) {
        if let Some(p) = program(id) {
            unsafe { self.gl.delete_program(p) }
        }
    }

    fn attach_shader(&self, program_id: GlHandle, shader_id: GlHandle) {
        if let (Some(p), Some(s)) = (program(program_id), shader(shader_id)) {
            unsafe { self.gl.attach_shader(p, s) }
        }
    }

    fn detach_shader(&self, program_id: GlHandle, shader_id: GlHandle) {
        if let (Some(p), Some(s)) = (program(program_id), shader(shader_id)) {
            unsafe { self.gl.detach_shader(p, s) }
        }
    }

    fn link_program(&self, id: GlHandle) {
        if let Some(p) = program(id) {
            unsafe { self.gl.link_program(p) }
        }
    }

    fn program_link_status(&self, id: GlHandle) -> bool {
        program(id).map_or(false, |p| unsafe { self.gl.get_program_link_status(p) })
    }

    fn program_info_log(&self, id: GlHandle) -> String {
        program(id)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn use_program(&self, id: Option<GlHandle>) {
        unsafe { self.gl.use_program(id.and_then(program)) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<GlHandle, String> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(shader_type) }.map(|s| s.0.get())
    }

    fn shader_source(&self, id: GlHandle, source: &str) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.shader_source(s, source) }
        }
    }

    fn compile_shader(&self, id: GlHandle) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.compile_shader(s) }
        }
    }

    fn shader_compile_status(&self, id: GlHandle) -> bool {
        shader(id).map_or(false, |s| unsafe { self.gl.get_shader_compile_status(s) })
    }

    fn shader_info_log(&self, id: GlHandle) -> String {
        shader(id)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, id: GlHandle) {
        if let Some(s) = shader(id) {
            unsafe { self.gl.delete_shader(s) }
        }
    }

    fn uniform_location(&self, program_id: GlHandle, name: &str) -> Option<u32> {
        let p = program(program_id)?;
        unsafe { self.gl.get_uniform_location(p, name) }.map(|location| location.0)
    }

    fn uniform_matrix4(&self, location: Option<u32>, columns: &[f32; 16]) {
        let location = location.map(glow::NativeUniformLocation);
        unsafe { self.gl.uniform_matrix_4_f32_slice(location.as_ref(), false, columns) }
    }

    fn uniform_float4(&self, location: Option<u32>, value: [f32; 4]) {
        let location = location.map(glow::NativeUniformLocation);
        let [x, y, z, w] = value;
        unsafe { self.gl.uniform_4_f32(location.as_ref(), x, y, z, w) }
    }

    fn create_vertex_array(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| v.0.get())
    }

    fn bind_vertex_array(&self, id: Option<GlHandle>) {
        unsafe { self.gl.bind_vertex_array(id.and_then(vertex_array)) }
    }

    fn delete_vertex_array(&self, id: GlHandle) {
        if let Some(v) = vertex_array(id) {
            unsafe { self.gl.delete_vertex_array(v) }
        }
    }

    fn create_buffer(&self) -> Result<GlHandle, String> {
        unsafe { self.gl.create_buffer() }.map(|b| b.0.get())
    }

    fn bind_buffer(&self, target: BufferTarget, id: Option<GlHandle>) {
        unsafe { self.gl.bind_buffer(buffer_target(target), id.and_then(buffer)) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, id: GlHandle) {
        if let Some(b) = buffer(id) {
            unsafe { self.gl.delete_buffer(b) }
        }
    }

    fn enable_vertex_attrib(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32, normalized: bool, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, normalized, stride, offset)
        }
    }

    fn clear_color(&self, color: Color) {
        unsafe { self.gl.clear_color(color.r, color.g, color.b, color.a) }
    }

    fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) }
    }

    fn draw_indexed_triangles(&self, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, 0)
        }
    }
}
