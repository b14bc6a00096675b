//! OpenGL 着色器程序
//!
//! 构造流程：
//! 1. 创建程序对象
//! 2. 依次编译顶点与片段阶段
//! 3. 附加、链接，然后分离并删除两个阶段对象
//!
//! 任一步失败都会先释放已创建的 GL 对象，再写出诊断日志并触发致命断言。

use std::rc::Rc;

use crate::core::config::RendererApi;
use crate::core::fatal;
use crate::core::math::{matrix, Color, Matrix4};
use crate::renderer::shader::{bounded_info_log, Shader, ShaderStage};
use crate::renderer::RendererId;

use super::device::{GlDevice, GlHandle};

/// OpenGL 着色器程序，独占一个程序句柄
pub struct OpenGlShader {
    device: Rc<dyn GlDevice>,
    program: GlHandle,
}

impl OpenGlShader {
    /// 编译并链接着色器程序
    ///
    /// 编译或链接失败时触发致命断言，不会返回部分构造的对象。
    pub fn new(device: Rc<dyn GlDevice>, vertex_src: &str, fragment_src: &str) -> Self {
        let program = match device.create_program() {
            Ok(program) => program,
            Err(error) => fatal::raise(format!("Failed to create shader program: {}", error)),
        };

        // 先构造对象，这样致命断言展开时程序句柄由 Drop 释放
        let shader = Self { device, program };

        let vertex = shader.compile_stage(ShaderStage::Vertex, vertex_src, &[]);
        let fragment = shader.compile_stage(ShaderStage::Fragment, fragment_src, &[vertex]);
        shader.link(&[vertex, fragment]);

        crate::engine_info!(program = shader.program, "Shader program linked");
        shader
    }

    /// 编译单个阶段；失败时删除 `compiled` 中已编译的阶段并触发致命断言
    fn compile_stage(&self, stage: ShaderStage, source: &str, compiled: &[GlHandle]) -> GlHandle {
        let handle = match self.device.create_shader(stage) {
            Ok(handle) => handle,
            Err(error) => {
                self.delete_stages(compiled);
                fatal::raise(format!("Failed to create {} shader: {}", stage.name(), error));
            }
        };

        self.device.shader_source(handle, source);
        self.device.compile_shader(handle);

        if !self.device.shader_compile_status(handle) {
            let log = self.device.shader_info_log(handle);
            self.device.delete_shader(handle);
            self.delete_stages(compiled);

            crate::engine_error!("Shader compilation error! Type: {}", stage.name());
            crate::engine_error!("Info log: {}", bounded_info_log(&log));
            fatal::raise("Shader compilation failure");
        }

        handle
    }

    fn link(&self, stages: &[GlHandle]) {
        for &stage in stages {
            self.device.attach_shader(self.program, stage);
        }
        self.device.link_program(self.program);

        if !self.device.program_link_status(self.program) {
            let log = self.device.program_info_log(self.program);
            self.delete_stages(stages);

            crate::engine_error!("Shader linking error");
            crate::engine_error!("Info log: {}", bounded_info_log(&log));
            fatal::raise("Shader linking failure");
        }

        for &stage in stages {
            self.device.detach_shader(self.program, stage);
            self.device.delete_shader(stage);
        }
    }

    fn delete_stages(&self, stages: &[GlHandle]) {
        for &stage in stages {
            self.device.delete_shader(stage);
        }
    }
}

impl Shader for OpenGlShader {
    fn api(&self) -> RendererApi {
        RendererApi::OpenGl
    }

    fn renderer_id(&self) -> RendererId {
        self.program
    }

    fn bind(&self) {
        self.device.use_program(Some(self.program));
    }

    fn unbind(&self) {
        self.device.use_program(None);
    }

    fn upload_uniform_mat4(&self, name: &str, matrix: &Matrix4) {
        let location = self.device.uniform_location(self.program, name);
        self.device.uniform_matrix4(location, &matrix::to_cols_array(matrix));
    }

    fn upload_uniform_float4(&self, name: &str, value: Color) {
        let location = self.device.uniform_location(self.program, name);
        self.device.uniform_float4(location, value.to_array());
    }
}

impl Drop for OpenGlShader {
    fn drop(&mut self) {
        self.device.delete_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fatal::intercept;
    use crate::renderer::shader::INFO_LOG_LIMIT;
    use crate::testing::{FakeGl, LogCapture, FLAT_FRAGMENT_SRC, FLAT_VERTEX_SRC, INVALID_VERTEX_SRC};

    fn build(gl: &Rc<FakeGl>) -> OpenGlShader {
        OpenGlShader::new(gl.clone(), FLAT_VERTEX_SRC, FLAT_FRAGMENT_SRC)
    }

    #[test]
    fn test_valid_sources_link() {
        let gl = Rc::new(FakeGl::new());
        let shader = build(&gl);

        assert_eq!(shader.api(), RendererApi::OpenGl);
        assert_eq!(gl.live_programs(), 1);
        // 链接后阶段对象已被删除
        assert_eq!(gl.live_shaders(), 0);

        drop(shader);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn test_compile_failure_is_fatal_and_logged() {
        let gl = Rc::new(FakeGl::new());
        let capture = LogCapture::new();

        let result = capture.run(|| intercept(|| OpenGlShader::new(gl.clone(), INVALID_VERTEX_SRC, FLAT_FRAGMENT_SRC)));

        let error = result.err().expect("compile failure must be fatal");
        assert_eq!(error.message, "Shader compilation failure");

        let messages = capture.messages();
        assert!(messages.iter().any(|m| m.contains("Shader compilation error") && m.contains("VERTEX")));

        let info = messages
            .iter()
            .find_map(|m| m.strip_prefix("Info log: "))
            .expect("info log is reported");
        assert!(!info.is_empty());
        assert!(info.len() <= INFO_LOG_LIMIT);

        // 失败路径不泄漏 GL 对象
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn test_fragment_failure_reports_fragment_stage() {
        let gl = Rc::new(FakeGl::new());
        let capture = LogCapture::new();

        let result = capture.run(|| intercept(|| OpenGlShader::new(gl.clone(), FLAT_VERTEX_SRC, "void main() {")));

        assert!(result.is_err());
        assert!(capture.messages().iter().any(|m| m.contains("FRAGMENT")));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn test_link_failure_is_fatal() {
        let gl = Rc::new(FakeGl::new());
        gl.fail_next_link("error: u_Color type mismatch");
        let capture = LogCapture::new();

        let result = capture.run(|| intercept(|| build(&gl)));

        let error = result.err().expect("link failure must be fatal");
        assert_eq!(error.message, "Shader linking failure");
        assert!(capture.messages().iter().any(|m| m.contains("type mismatch")));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn test_upload_mat4_is_column_major() {
        let gl = Rc::new(FakeGl::new());
        let shader = build(&gl);
        let transform = matrix::translation(3.0, 4.0, 5.0);

        shader.bind();
        shader.upload_uniform_mat4("u_Transform", &transform);

        let uploaded = gl.uniform_value(shader.renderer_id(), "u_Transform").unwrap();
        assert_eq!(&uploaded[12..15], &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_upload_float4() {
        let gl = Rc::new(FakeGl::new());
        let shader = build(&gl);

        shader.bind();
        shader.upload_uniform_float4("u_Color", Color::new(0.1, 0.2, 0.3, 0.4));

        let uploaded = gl.uniform_value(shader.renderer_id(), "u_Color").unwrap();
        assert_eq!(&uploaded[..4], &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_unknown_uniform_is_ignored() {
        let gl = Rc::new(FakeGl::new());
        let shader = build(&gl);
        shader.bind();
        shader.upload_uniform_mat4("u_Transform", &Matrix4::identity());

        let capture = LogCapture::new();
        capture.run(|| shader.upload_uniform_mat4("u_DoesNotExist", &matrix::scaling(2.0, 2.0, 2.0)));

        assert_eq!(capture.error_count(), 0);
        assert_eq!(gl.uniform_value(shader.renderer_id(), "u_DoesNotExist"), None);
        assert_eq!(
            gl.uniform_value(shader.renderer_id(), "u_Transform"),
            Some(matrix::to_cols_array(&Matrix4::identity()).to_vec())
        );
    }

    #[test]
    fn test_bind_and_unbind() {
        let gl = Rc::new(FakeGl::new());
        let shader = build(&gl);

        shader.bind();
        assert_eq!(gl.current_program(), Some(shader.renderer_id()));
        shader.unbind();
        assert_eq!(gl.current_program(), None);
    }
}
