//! 顶点缓冲区布局
//!
//! 描述交错顶点数据的格式：每个属性的类型、字节偏移与整体步长。
//! 布局与具体图形 API 无关，由各后端的顶点数组负责翻译成属性指针。

/// 着色器数据类型（仅浮点类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    Float,
    Float2,
    Float3,
    Float4,
    Mat3,
    Mat4,
}

impl ShaderDataType {
    /// 类型的字节大小
    pub fn size(&self) -> u32 {
        self.component_count() * std::mem::size_of::<f32>() as u32
    }

    /// 总分量数
    pub fn component_count(&self) -> u32 {
        match self {
            ShaderDataType::Float => 1,
            ShaderDataType::Float2 => 2,
            ShaderDataType::Float3 => 3,
            ShaderDataType::Float4 => 4,
            ShaderDataType::Mat3 => 3 * 3,
            ShaderDataType::Mat4 => 4 * 4,
        }
    }

    /// 占用的属性槽数量（矩阵按列占用多个槽）
    pub fn attribute_slots(&self) -> u32 {
        match self {
            ShaderDataType::Mat3 => 3,
            ShaderDataType::Mat4 => 4,
            _ => 1,
        }
    }

    /// 每个属性槽的分量数
    pub fn slot_components(&self) -> u32 {
        self.component_count() / self.attribute_slots()
    }
}

/// 布局中的单个属性
#[derive(Debug, Clone, PartialEq)]
pub struct BufferElement {
    /// 属性名称（与着色器输入对应，仅用于调试）
    pub name: String,
    /// 数据类型
    pub data_type: ShaderDataType,
    /// 字节大小
    pub size: u32,
    /// 在单个顶点内的字节偏移
    pub offset: u32,
    /// 是否归一化
    pub normalized: bool,
}

impl BufferElement {
    /// 创建属性（偏移由 `BufferLayout` 计算）
    pub fn new(data_type: ShaderDataType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
            size: data_type.size(),
            offset: 0,
            normalized: false,
        }
    }

    /// 标记为归一化属性
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }
}

/// 交错顶点布局
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferLayout {
    elements: Vec<BufferElement>,
    stride: u32,
}

impl BufferLayout {
    /// 根据属性列表创建布局，按顺序计算偏移和步长
    pub fn new(elements: Vec<BufferElement>) -> Self {
        let mut layout = Self { elements, stride: 0 };
        let mut offset = 0;
        for element in &mut layout.elements {
            element.offset = offset;
            offset += element.size;
        }
        layout.stride = offset;
        layout
    }

    /// 单个顶点的字节数
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn elements(&self) -> &[BufferElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 单个顶点包含的 f32 个数
    pub fn floats_per_vertex(&self) -> usize {
        (self.stride / std::mem::size_of::<f32>() as u32) as usize
    }
}

impl<'a> IntoIterator for &'a BufferLayout {
    type Item = &'a BufferElement;
    type IntoIter = std::slice::Iter<'a, BufferElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
