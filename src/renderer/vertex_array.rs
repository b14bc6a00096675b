//! 顶点数组接口
//!
//! 顶点数组由 `ResourceFactory` 按当前后端创建，调用方独占返回的对象；
//! 填充完顶点与索引后通常转为 `Rc<dyn VertexArray>` 在多个绘制调用间共享。

use crate::core::config::RendererApi;

use super::buffer::BufferLayout;
use super::RendererId;

/// 顶点数组（顶点缓冲区 + 索引缓冲区 + 属性布局）
pub trait VertexArray {
    /// 创建此顶点数组的后端
    fn api(&self) -> RendererApi;

    /// 后端顶点数组句柄
    fn renderer_id(&self) -> RendererId;

    fn bind(&self);

    fn unbind(&self);

    /// 上传一块交错顶点数据，并按布局设置属性
    ///
    /// 布局为空是编程错误，会触发致命断言。
    fn add_vertex_buffer(&mut self, vertices: &[f32], layout: BufferLayout);

    /// 上传索引数据，替换已有的索引缓冲区
    fn set_index_buffer(&mut self, indices: &[u32]);

    /// 当前索引数量
    fn index_count(&self) -> u32;
}
