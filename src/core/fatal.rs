//! 致命断言
//!
//! 用于"不可恢复的内容或配置错误"：着色器编译/链接失败、
//! 在 `RendererApi::None` 上创建资源、驱动拒绝分配句柄等。
//! 这些错误不会以 `Result` 的形式返回，而是由 [`raise`] 记录诊断后立即终止执行。
//!
//! 终止通过携带 [`FatalError`] 的 unwind 实现，因此嵌入方（以及测试）可以用
//! [`intercept`] 将其截获为 `Err(FatalError)`，而不必让整个进程退出。
//! 其他 panic 不会被 [`intercept`] 吞掉。

use std::panic::{self, AssertUnwindSafe, Location};

use thiserror::Error;

/// 致命错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Fatal engine error at {file}:{line}: {message}")]
pub struct FatalError {
    /// 断言消息
    pub message: String,
    /// 触发位置（文件）
    pub file: &'static str,
    /// 触发位置（行号）
    pub line: u32,
}

/// 触发致命断言
///
/// 先在引擎日志通道以 error 级别输出消息，再终止当前执行流。
#[track_caller]
pub fn raise(message: impl Into<String>) -> ! {
    let location = Location::caller();
    let error = FatalError {
        message: message.into(),
        file: location.file(),
        line: location.line(),
    };

    crate::engine_error!(
        source_file = error.file,
        source_line = error.line,
        "Assertion failed: {}",
        error.message
    );
    panic::panic_any(error)
}

/// 执行闭包并截获其中触发的致命断言
///
/// 返回 `Err(FatalError)` 表示闭包因致命断言而终止；
/// 其他类型的 panic 会继续向上传播。
pub fn intercept<T, F>(f: F) -> Result<T, FatalError>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<FatalError>() {
            Ok(error) => Err(*error),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// 引擎断言：条件不成立时触发致命断言
///
/// ```should_panic
/// let api_ready = false;
/// strata_render::engine_assert!(api_ready, "renderer API {} is not ready", "Vulkan");
/// ```
#[macro_export]
macro_rules! engine_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::core::fatal::raise(format!($($arg)+));
        }
    };
}
