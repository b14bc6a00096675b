//! 单元测试共用的辅助工具
//!
//! - [`FakeGl`]：内存中的 GL 设备，记录调用并模拟编译、链接与 uniform 存储
//! - [`LogCapture`]：捕获 `tracing` 事件的订阅层
//! - [`RecordingLayer`]：把回调顺序写入共享日志的层

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};

use crate::core::event::Event;
use crate::core::layer::Layer;
use crate::core::math::Color;
use crate::core::time::Timestep;
use crate::gfx::opengl::{opengl_factory, BufferTarget, GlDevice, GlHandle};
use crate::renderer::buffer::{BufferElement, BufferLayout, ShaderDataType};
use crate::renderer::factory::ResourceFactory;
use crate::renderer::shader::ShaderStage;
use crate::renderer::vertex_array::VertexArray;
use crate::renderer::Renderer;

pub const FLAT_VERTEX_SRC: &str = r#"
#version 330 core

layout(location = 0) in vec3 a_Position;

uniform mat4 u_ViewProjection;
uniform mat4 u_Transform;

void main()
{
    gl_Position = u_ViewProjection * u_Transform * vec4(a_Position, 1.0);
}
"#;

pub const FLAT_FRAGMENT_SRC: &str = r#"
#version 330 core

layout(location = 0) out vec4 color;

uniform vec4 u_Color;

void main()
{
    color = u_Color;
}
"#;

/// 缺少右花括号
pub const INVALID_VERTEX_SRC: &str = r#"
#version 330 core

layout(location = 0) in vec3 a_Position;

void main()
{
    gl_Position = vec4(a_Position, 1.0);
"#;

// ---------------------------------------------------------------------------
// FakeGl
// ---------------------------------------------------------------------------

/// 记录下来的 GL 调用（只记录有副作用、测试关心的调用）
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    UseProgram(Option<GlHandle>),
    BindVertexArray(Option<GlHandle>),
    BindBuffer(BufferTarget, Option<GlHandle>),
    BufferData(BufferTarget, usize),
    EnableAttrib(u32),
    AttribPointer {
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    ClearColor([f32; 4]),
    Clear,
    DrawIndexed(i32),
}

struct FakeShader {
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<GlHandle>,
    linked: bool,
    info_log: String,
    values: HashMap<String, Vec<f32>>,
}

#[derive(Default)]
struct FakeState {
    next_handle: u32,
    programs: HashMap<GlHandle, FakeProgram>,
    shaders: HashMap<GlHandle, FakeShader>,
    vertex_arrays: HashSet<GlHandle>,
    buffers: HashMap<GlHandle, usize>,
    bound_buffers: HashMap<BufferTarget, GlHandle>,
    /// uniform 位置 -> (程序, 名称)
    locations: HashMap<u32, (GlHandle, String)>,
    current_program: Option<GlHandle>,
    pending_link_failure: Option<String>,
    calls: Vec<GlCall>,
}

impl FakeState {
    fn allocate(&mut self) -> GlHandle {
        self.next_handle += 1;
        self.next_handle
    }
}

/// 内存中的 GL 设备
#[derive(Default)]
pub struct FakeGl {
    state: RefCell<FakeState>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一次 `link_program` 失败并返回给定的诊断日志
    pub fn fail_next_link(&self, info_log: &str) {
        self.state.borrow_mut().pending_link_failure = Some(info_log.to_string());
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&GlCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|call| predicate(call)).count()
    }

    /// 最近一次上传到 `program` 中名为 `name` 的 uniform 的值
    pub fn uniform_value(&self, program: GlHandle, name: &str) -> Option<Vec<f32>> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.values.get(name).cloned())
    }

    pub fn current_program(&self) -> Option<GlHandle> {
        self.state.borrow().current_program
    }

    pub fn buffer_size(&self, buffer: GlHandle) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer).copied()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn upload(&self, location: Option<u32>, value: Vec<f32>) {
        let mut state = self.state.borrow_mut();
        let Some(location) = location else {
            return;
        };
        let Some((owner, name)) = state.locations.get(&location).cloned() else {
            return;
        };
        if state.current_program != Some(owner) {
            return;
        }
        if let Some(program) = state.programs.get_mut(&owner) {
            program.values.insert(name, value);
        }
    }
}

/// 源码能否"编译"：包含入口函数且花括号配对
fn compiles(source: &str) -> bool {
    let mut depth = 0i32;
    for c in source.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0 && source.contains("void main")
}

/// 解析 `uniform <type> <name>;` 声明
fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let mut parts = line.trim().split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some("uniform"), Some(_), Some(name)) => Some(name.trim_end_matches(';').to_string()),
                _ => None,
            }
        })
        .collect()
}

impl GlDevice for FakeGl {
    fn create_program(&self) -> Result<GlHandle, String> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.programs.insert(handle, FakeProgram::default());
        Ok(handle)
    }

    fn delete_program(&self, program: GlHandle) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.locations.retain(|_, (owner, _)| *owner != program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn attach_shader(&self, program: GlHandle, shader: GlHandle) {
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GlHandle, shader: GlHandle) {
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program) {
            program.attached.retain(|&attached| attached != shader);
        }
    }

    fn link_program(&self, program: GlHandle) {
        let mut state = self.state.borrow_mut();
        let failure = state.pending_link_failure.take();

        let attached = match state.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => return,
        };
        let all_compiled = attached
            .iter()
            .all(|shader| state.shaders.get(shader).map_or(false, |s| s.compiled));
        let uniforms: Vec<String> = attached
            .iter()
            .filter_map(|shader| state.shaders.get(shader))
            .flat_map(|s| declared_uniforms(&s.source))
            .collect();

        let (linked, info_log) = match failure {
            Some(log) => (false, log),
            None if !all_compiled => (false, "error: attached shader is not compiled".to_string()),
            None => (true, String::new()),
        };

        if linked {
            for name in uniforms {
                let location = state.allocate();
                state.locations.insert(location, (program, name));
            }
        }

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = linked;
            p.info_log = info_log;
        }
    }

    fn program_link_status(&self, program: GlHandle) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GlHandle) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<GlHandle>) {
        self.state.borrow_mut().current_program = program;
        self.record(GlCall::UseProgram(program));
    }

    fn create_shader(&self, _stage: ShaderStage) -> Result<GlHandle, String> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.shaders.insert(
            handle,
            FakeShader {
                source: String::new(),
                compiled: false,
            },
        );
        Ok(handle)
    }

    fn shader_source(&self, shader: GlHandle, source: &str) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            shader.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: GlHandle) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader) {
            shader.compiled = compiles(&shader.source);
        }
    }

    fn shader_compile_status(&self, shader: GlHandle) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GlHandle) -> String {
        let state = self.state.borrow();
        match state.shaders.get(&shader) {
            Some(s) if !s.compiled => {
                // 驱动日志往往很长，超过引擎保留的上限
                let line = "ERROR: 0:9: '' : syntax error: unexpected end of file\n";
                line.repeat(2048 / line.len() + 1)
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: GlHandle) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn uniform_location(&self, program: GlHandle, name: &str) -> Option<u32> {
        self.state
            .borrow()
            .locations
            .iter()
            .find(|(_, (owner, uniform))| *owner == program && uniform == name)
            .map(|(location, _)| *location)
    }

    fn uniform_matrix4(&self, location: Option<u32>, columns: &[f32; 16]) {
        self.upload(location, columns.to_vec());
    }

    fn uniform_float4(&self, location: Option<u32>, value: [f32; 4]) {
        self.upload(location, value.to_vec());
    }

    fn create_vertex_array(&self) -> Result<GlHandle, String> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.vertex_arrays.insert(handle);
        Ok(handle)
    }

    fn bind_vertex_array(&self, vertex_array: Option<GlHandle>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: GlHandle) {
        self.state.borrow_mut().vertex_arrays.remove(&vertex_array);
    }

    fn create_buffer(&self) -> Result<GlHandle, String> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.buffers.insert(handle, 0);
        Ok(handle)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<GlHandle>) {
        {
            let mut state = self.state.borrow_mut();
            match buffer {
                Some(buffer) => state.bound_buffers.insert(target, buffer),
                None => state.bound_buffers.remove(&target),
            };
        }
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(&bound) = state.bound_buffers.get(&target) {
                state.buffers.insert(bound, data.len());
            }
        }
        self.record(GlCall::BufferData(target, data.len()));
    }

    fn delete_buffer(&self, buffer: GlHandle) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.bound_buffers.retain(|_, bound| *bound != buffer);
    }

    fn enable_vertex_attrib(&self, index: u32) {
        self.record(GlCall::EnableAttrib(index));
    }

    fn vertex_attrib_pointer(&self, index: u32, components: i32, normalized: bool, stride: i32, offset: i32) {
        self.record(GlCall::AttribPointer {
            index,
            components,
            normalized,
            stride,
            offset,
        });
    }

    fn clear_color(&self, color: Color) {
        self.record(GlCall::ClearColor(color.to_array()));
    }

    fn clear(&self) {
        self.record(GlCall::Clear);
    }

    fn draw_indexed_triangles(&self, index_count: i32) {
        self.record(GlCall::DrawIndexed(index_count));
    }
}

/// 以 [`FakeGl`] 为设备的 OpenGL 工厂
pub fn opengl_fixture() -> (Rc<FakeGl>, ResourceFactory) {
    let gl = Rc::new(FakeGl::new());
    let factory = opengl_factory(gl.clone());
    (gl, factory)
}

/// 4 个顶点、6 个索引的单位四边形
pub fn quad_vertex_array(factory: &ResourceFactory) -> Rc<dyn VertexArray> {
    let mut vertex_array = factory
        .create_vertex_array()
        .expect("factory has a provider for its api");

    #[rustfmt::skip]
    let vertices = [
        -0.5, -0.5, 0.0,
         0.5, -0.5, 0.0,
         0.5,  0.5, 0.0,
        -0.5,  0.5, 0.0,
    ];
    vertex_array.add_vertex_buffer(
        &vertices,
        BufferLayout::new(vec![BufferElement::new(ShaderDataType::Float3, "a_Position")]),
    );
    vertex_array.set_index_buffer(&[0, 1, 2, 2, 3, 0]);

    Rc::from(vertex_array)
}

/// 以 [`FakeGl`] 为设备的渲染器
pub fn fake_renderer() -> (Rc<FakeGl>, Renderer) {
    let (gl, factory) = opengl_fixture();
    let renderer = Renderer::new(factory, Color::BLACK).expect("opengl is registered");
    (gl, renderer)
}

// ---------------------------------------------------------------------------
// LogCapture
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// 捕获 `tracing` 事件的订阅层
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在捕获范围内执行闭包（仅对当前线程生效）
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn error_count(&self) -> usize {
        self.records()
            .iter()
            .filter(|r| r.level == Level::ERROR)
            .count()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for LogCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        if let Ok(mut records) = self.records.lock() {
            records.push(LogRecord {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message: visitor.message,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingLayer
// ---------------------------------------------------------------------------

/// 多个层共享的回调日志，每条形如 `"<层名>:<回调>"`
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// 把每次回调写入 [`Journal`] 的层
pub struct RecordingLayer {
    name: String,
    journal: Journal,
    consumes_events: bool,
}

impl RecordingLayer {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            consumes_events: false,
        }
    }

    /// 处理并消费收到的所有事件
    pub fn consuming(mut self) -> Self {
        self.consumes_events = true;
        self
    }

    fn note(&self, callback: &str) {
        self.journal.borrow_mut().push(format!("{}:{}", self.name, callback));
    }
}

impl Layer for RecordingLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_attach(&mut self) {
        self.note("attach");
    }

    fn on_detach(&mut self) {
        self.note("detach");
    }

    fn on_update(&mut self, _timestep: Timestep) {
        self.note("update");
    }

    fn on_render(&mut self, _renderer: &mut Renderer) {
        self.note("render");
    }

    fn on_event(&mut self, _event: &mut dyn Event) -> bool {
        self.note("event");
        self.consumes_events
    }
}
