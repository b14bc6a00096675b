//! 渲染器模块
//!
//! 本模块提供了与图形 API 无关的渲染接口。层（Layer）只通过这里发出渲染调用，
//! 而不需要关心当前使用的是哪个图形 API。
//!
//! # 架构设计
//!
//! - `RendererBackend`：每个图形 API 实现的底层接口（清屏、索引绘制）
//! - `ResourceFactory`：按配置的 API 分发资源创建（着色器、顶点数组、后端本身）
//! - `Renderer`：对外的前端，持有唯一的后端实例与工厂，负责场景提交
//!
//! ```text
//! Layer ──► Renderer ──► Box<dyn RendererBackend> ──► GlDevice / ...
//!              │
//!              └──► ResourceFactory ──► BackendProvider（按 RendererApi 注册）
//! ```

use std::rc::Rc;

use crate::core::config::RendererApi;
use crate::core::error::{GraphicsError, Result};
use crate::core::math::{Color, Matrix4};

pub mod buffer;
pub mod camera;
pub mod factory;
pub mod shader;
pub mod vertex_array;

pub use buffer::{BufferElement, BufferLayout, ShaderDataType};
pub use camera::OrthographicCamera;
pub use factory::{BackendProvider, ResourceFactory};
pub use shader::{Shader, ShaderStage};
pub use vertex_array::VertexArray;

/// 后端分配的资源句柄（不透明整数）
pub type RendererId = u32;

/// 渲染后端接口
///
/// 每个图形 API 提供一个实现；一个引擎实例只存在一个活动后端。
pub trait RendererBackend {
    /// 此后端对应的渲染 API（构造后不会改变）
    fn api(&self) -> RendererApi;

    /// 使用后端默认颜色清屏
    fn clear(&mut self);

    /// 使用指定 RGBA 颜色清屏
    fn clear_with_color(&mut self, color: Color);

    /// 使用顶点数组发出一次索引绘制
    fn draw_indexed(&mut self, vertex_array: &Rc<dyn VertexArray>);
}

/// 一个场景内的渲染统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// 绘制调用次数
    pub draw_calls: u32,
    /// 提交的索引总数
    pub indices: u64,
}

/// 渲染器前端
///
/// # 示例
///
/// ```ignore
/// renderer.begin_scene(&camera);
/// renderer.submit(shader.as_ref(), &quad, &Matrix4::identity());
/// renderer.end_scene();
/// ```
pub struct Renderer {
    factory: ResourceFactory,
    backend: Box<dyn RendererBackend>,
    view_projection: Matrix4,
    in_scene: bool,
    current: RenderStats,
    last_scene: RenderStats,
}

impl Renderer {
    /// 通过工厂创建当前 API 的后端
    ///
    /// - API 为 `None`：致命断言
    /// - API 未注册：返回 `GraphicsError::UnsupportedApi`
    pub fn new(factory: ResourceFactory, clear_color: Color) -> Result<Self> {
        let backend = factory
            .create_renderer_backend(clear_color)
            .ok_or(GraphicsError::UnsupportedApi(factory.api()))?;

        crate::engine_info!(api = backend.api().name(), "Renderer backend created");

        Ok(Self {
            factory,
            backend,
            view_projection: Matrix4::identity(),
            in_scene: false,
            current: RenderStats::default(),
            last_scene: RenderStats::default(),
        })
    }

    /// 当前渲染 API
    pub fn api(&self) -> RendererApi {
        self.backend.api()
    }

    /// 资源工厂（用于创建着色器、顶点数组）
    pub fn factory(&self) -> &ResourceFactory {
        &self.factory
    }

    pub fn clear(&mut self) {
        self.backend.clear();
    }

    pub fn clear_with_color(&mut self, color: Color) {
        self.backend.clear_with_color(color);
    }

    /// 开始一个场景，记录相机的 view-projection
    pub fn begin_scene(&mut self, camera: &OrthographicCamera) {
        self.view_projection = *camera.view_projection();
        self.in_scene = true;
        self.current = RenderStats::default();
    }

    /// 结束场景并保存统计
    pub fn end_scene(&mut self) {
        self.in_scene = false;
        self.last_scene = self.current;
    }

    /// 提交一次绘制
    ///
    /// 绑定着色器，上传 `u_ViewProjection` 与 `u_Transform`，然后绘制顶点数组。
    /// 必须位于 `begin_scene` / `end_scene` 之间。
    pub fn submit(&mut self, shader: &dyn Shader, vertex_array: &Rc<dyn VertexArray>, transform: &Matrix4) {
        crate::engine_assert!(self.in_scene, "Renderer::submit called outside of a scene");

        shader.bind();
        shader.upload_uniform_mat4("u_ViewProjection", &self.view_projection);
        shader.upload_uniform_mat4("u_Transform", transform);

        self.backend.draw_indexed(vertex_array);

        self.current.draw_calls += 1;
        self.current.indices += u64::from(vertex_array.index_count());
    }

    /// 直接发出索引绘制（不经过场景）
    pub fn draw_indexed(&mut self, vertex_array: &Rc<dyn VertexArray>) {
        self.backend.draw_indexed(vertex_array);
    }

    /// 上一个已结束场景的统计
    pub fn stats(&self) -> RenderStats {
        self.last_scene
    }
}
