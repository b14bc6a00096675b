//! 着色器接口
//!
//! 着色器程序是最典型的图形资源：它在整个生命周期内独占一个后端分配的程序句柄，
//! 构造时编译并链接源码，析构时释放句柄。着色器不可复制。
//!
//! # 错误策略
//!
//! 编译或链接失败属于开发期的内容错误，不可恢复：
//! 诊断日志（最多 [`INFO_LOG_LIMIT`] 字节）以 error 级别写入引擎日志后，
//! 立即触发致命断言。
//!
//! 上传到不存在的 uniform 会被后端静默忽略，这是有意保留的宽松行为。

use crate::core::config::RendererApi;
use crate::core::math::{Color, Matrix4};

use super::RendererId;

/// 诊断日志的最大长度（字节）
pub const INFO_LOG_LIMIT: usize = 1024;

/// 着色器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// 顶点着色器
    Vertex,
    /// 片段着色器
    Fragment,
}

impl ShaderStage {
    /// 阶段名称（用于诊断日志）
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

/// 着色器程序
pub trait Shader {
    /// 创建此着色器的后端
    fn api(&self) -> RendererApi;

    /// 后端程序句柄
    fn renderer_id(&self) -> RendererId;

    /// 设为后续绘制调用使用的程序
    fn bind(&self);

    /// 取消当前程序
    fn unbind(&self);

    /// 按名称上传 4x4 矩阵（列主序）
    ///
    /// 名称在程序中不存在时不做任何事，也不报错。
    fn upload_uniform_mat4(&self, name: &str, matrix: &Matrix4);

    /// 按名称上传 vec4，名称不存在时同样静默忽略
    fn upload_uniform_float4(&self, name: &str, value: Color);
}

/// 将后端诊断日志截断到 [`INFO_LOG_LIMIT`] 字节
///
/// 截断位置落在 UTF-8 字符边界上；末尾的 NUL 与空白会被去掉。
pub fn bounded_info_log(log: &str) -> &str {
    let mut end = log.len().min(INFO_LOG_LIMIT);
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}
