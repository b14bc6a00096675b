//! OpenGL 驱动接口
//!
//! `GlDevice` 是 OpenGL 资源与驱动之间的唯一接缝：着色器、顶点数组和渲染后端
//! 只通过它发出句柄级别的 GL 调用。句柄是驱动分配的不透明整数，
//! 本层从不解释其数值，只把它交还给同一个设备。
//!
//! 所有调用都必须发生在拥有 GL 上下文的渲染线程上。

use crate::core::math::Color;
use crate::renderer::shader::ShaderStage;
use crate::renderer::RendererId;

/// GL 对象句柄
pub type GlHandle = RendererId;

/// 缓冲区绑定目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// 顶点缓冲区（GL_ARRAY_BUFFER）
    Vertex,
    /// 索引缓冲区（GL_ELEMENT_ARRAY_BUFFER）
    Index,
}

/// OpenGL 驱动调用
///
/// 方法与 GL 入口一一对应。`create_*` 在驱动无法分配对象时返回错误字符串。
/// uniform 位置为 `None` 时，上传调用是空操作（与 GL 对位置 -1 的处理一致）。
pub trait GlDevice {
    fn create_program(&self) -> Result<GlHandle, String>;
    fn delete_program(&self, program: GlHandle);
    fn attach_shader(&self, program: GlHandle, shader: GlHandle);
    fn detach_shader(&self, program: GlHandle, shader: GlHandle);
    fn link_program(&self, program: GlHandle);
    fn program_link_status(&self, program: GlHandle) -> bool;
    fn program_info_log(&self, program: GlHandle) -> String;
    fn use_program(&self, program: Option<GlHandle>);

    fn create_shader(&self, stage: ShaderStage) -> Result<GlHandle, String>;
    fn shader_source(&self, shader: GlHandle, source: &str);
    fn compile_shader(&self, shader: GlHandle);
    fn shader_compile_status(&self, shader: GlHandle) -> bool;
    fn shader_info_log(&self, shader: GlHandle) -> String;
    fn delete_shader(&self, shader: GlHandle);

    /// 在程序中按名称查找 uniform，找不到时返回 `None`
    fn uniform_location(&self, program: GlHandle, name: &str) -> Option<u32>;
    /// 向当前程序上传列主序 4x4 矩阵
    fn uniform_matrix4(&self, location: Option<u32>, columns: &[f32; 16]);
    fn uniform_float4(&self, location: Option<u32>, value: [f32; 4]);

    fn create_vertex_array(&self) -> Result<GlHandle, String>;
    fn bind_vertex_array(&self, vertex_array: Option<GlHandle>);
    fn delete_vertex_array(&self, vertex_array: GlHandle);

    fn create_buffer(&self) -> Result<GlHandle, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<GlHandle>);
    /// 将数据上传到当前绑定在 `target` 上的缓冲区（静态用途）
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: GlHandle);

    fn enable_vertex_attrib(&self, index: u32);
    /// 浮点顶点属性；`stride` 与 `offset` 以字节为单位
    fn vertex_attrib_pointer(&self, index: u32, components: i32, normalized: bool, stride: i32, offset: i32);

    fn clear_color(&self, color: Color);
    /// 清除颜色与深度缓冲
    fn clear(&self);
    /// 以 `u32` 索引绘制三角形列表
    fn draw_indexed_triangles(&self, index_count: i32);
}
