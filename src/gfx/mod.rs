//! 图形后端模块
//!
//! 本模块包含各图形 API 的具体实现。每个后端向 `ResourceFactory` 注册一个
//! `BackendProvider`，上层渲染逻辑只通过 `renderer` 模块的 trait 访问它们。
//!
//! 目前只有 OpenGL 后端。Direct3D、Vulkan 与 Metal 在 `RendererApi` 中保留了枚举值，
//! 但没有注册提供者，工厂遇到它们时会记录 "Unknown RendererApi" 并返回 `None`。

pub mod opengl;

pub use opengl::{opengl_factory, OpenGlProvider};
