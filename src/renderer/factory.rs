//! 资源工厂
//!
//! 按配置的渲染 API 创建后端相关的资源，并以公共接口返回。
//!
//! # 分发规则
//!
//! | 当前 API | 结果 |
//! |----------|------|
//! | `None` | 致命断言（没有后端就不可能存在渲染资源） |
//! | 已注册的 API | 新创建的资源，调用方独占所有权 |
//! | 未注册的 API（Direct3D / Vulkan / Metal 等） | 记录一条 "Unknown RendererApi" 错误并返回 `None` |
//!
//! 各后端通过 [`ResourceFactory::register`] 注册一个 [`BackendProvider`]，
//! 新增后端不需要修改分发逻辑。工厂不缓存任何资源。
//!
//! 工厂的 API 在构造时确定且不可修改，因此已创建的资源与工厂的分发结果始终一致。

use std::collections::HashMap;
use std::fmt;

use crate::core::config::RendererApi;
use crate::core::fatal;
use crate::core::math::Color;

use super::shader::Shader;
use super::vertex_array::VertexArray;
use super::RendererBackend;

/// 某个渲染 API 的资源构造器集合
pub trait BackendProvider {
    /// 创建渲染后端，`clear_color` 为 `clear()` 使用的默认颜色
    fn create_renderer_backend(&self, clear_color: Color) -> Box<dyn RendererBackend>;

    fn create_vertex_array(&self) -> Box<dyn VertexArray>;

    /// 编译并链接着色器程序；失败时触发致命断言
    fn create_shader(&self, vertex_src: &str, fragment_src: &str) -> Box<dyn Shader>;
}

/// 资源工厂
pub struct ResourceFactory {
    api: RendererApi,
    providers: HashMap<RendererApi, Box<dyn BackendProvider>>,
}

impl ResourceFactory {
    /// 创建面向 `api` 的工厂（尚未注册任何后端）
    pub fn new(api: RendererApi) -> Self {
        Self {
            api,
            providers: HashMap::new(),
        }
    }

    /// 注册后端并返回自身，便于链式构造
    pub fn with_provider<P>(mut self, api: RendererApi, provider: P) -> Self
    where
        P: BackendProvider + 'static,
    {
        self.register(api, Box::new(provider));
        self
    }

    /// 为 `api` 注册后端，返回被替换的旧后端
    ///
    /// `RendererApi::None` 不能拥有后端，为它注册会触发致命断言。
    pub fn register(
        &mut self,
        api: RendererApi,
        provider: Box<dyn BackendProvider>,
    ) -> Option<Box<dyn BackendProvider>> {
        crate::engine_assert!(!api.is_none(), "RendererApi::None cannot have a backend");
        crate::engine_debug!(api = api.name(), "Registered renderer backend");
        self.providers.insert(api, provider)
    }

    /// 当前生效的渲染 API
    pub fn api(&self) -> RendererApi {
        self.api
    }

    /// `api` 是否已注册后端
    pub fn is_registered(&self, api: RendererApi) -> bool {
        self.providers.contains_key(&api)
    }

    /// 已注册后端的 API 列表（按声明顺序）
    pub fn registered_apis(&self) -> Vec<RendererApi> {
        RendererApi::ALL
            .into_iter()
            .filter(|api| self.is_registered(*api))
            .collect()
    }

    /// 创建渲染后端
    pub fn create_renderer_backend(&self, clear_color: Color) -> Option<Box<dyn RendererBackend>> {
        self.provider()
            .map(|provider| provider.create_renderer_backend(clear_color))
    }

    /// 创建顶点数组
    pub fn create_vertex_array(&self) -> Option<Box<dyn VertexArray>> {
        self.provider().map(|provider| provider.create_vertex_array())
    }

    /// 创建着色器程序
    pub fn create_shader(&self, vertex_src: &str, fragment_src: &str) -> Option<Box<dyn Shader>> {
        self.provider()
            .map(|provider| provider.create_shader(vertex_src, fragment_src))
    }

    fn provider(&self) -> Option<&dyn BackendProvider> {
        if self.api.is_none() {
            fatal::raise("RendererApi::None is not supported!");
        }

        match self.providers.get(&self.api) {
            Some(provider) => Some(provider.as_ref()),
            None => {
                crate::engine_error!(api = self.api.name(), "Unknown RendererApi");
                None
            }
        }
    }
}

impl fmt::Debug for ResourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceFactory")
            .field("api", &self.api)
            .field("registered", &self.registered_apis())
            .finish()
    }
}
