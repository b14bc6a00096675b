//! 层栈
//!
//! 层栈是一个分成两个区域的有序序列：
//!
//! ```text
//! [ layer0, layer1, ..., layerN | overlay0, ..., overlayM ]
//!                               ^
//!                         insert_index
//! ```
//!
//! - 普通层总是插入在 `insert_index` 处，随后游标前移一位
//! - 覆盖层总是追加在序列末尾，游标不变
//!
//! 因此无论压入顺序如何，所有普通层都位于所有覆盖层之前，
//! `insert_index` 始终指向第一个覆盖层（或序列末尾）。
//!
//! 更新和渲染按序列正向进行，事件按反向传递（覆盖层先收到事件），
//! 一旦事件被处理就停止传递。

use std::iter::FusedIterator;

use crate::core::event::Event;
use crate::core::layer::{Layer, LayerId};
use crate::core::time::Timestep;
use crate::renderer::Renderer;

struct LayerEntry {
    id: LayerId,
    layer: Box<dyn Layer>,
}

/// 层栈
pub struct LayerStack {
    entries: Vec<LayerEntry>,
    /// 第一个覆盖层的位置
    insert_index: usize,
    next_id: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            insert_index: 0,
            next_id: 1,
        }
    }

    /// 压入普通层（位于所有普通层之后、所有覆盖层之前）
    ///
    /// 层栈获得所有权并调用 `on_attach`。
    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) -> LayerId {
        let id = self.allocate_id();
        crate::engine_debug!(layer = layer.name(), %id, "Push layer");

        layer.on_attach();
        self.entries.insert(self.insert_index, LayerEntry { id, layer });
        self.insert_index += 1;
        id
    }

    /// 压入覆盖层（追加在序列末尾）
    pub fn push_overlay(&mut self, mut layer: Box<dyn Layer>) -> LayerId {
        let id = self.allocate_id();
        crate::engine_debug!(layer = layer.name(), %id, "Push overlay");

        layer.on_attach();
        self.entries.push(LayerEntry { id, layer });
        id
    }

    /// 从普通层区域移除 `id`，调用 `on_detach` 并交还所有权
    ///
    /// `id` 不在普通层区域时记录警告并返回 `None`，层栈保持不变。
    pub fn pop_layer(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        let Some(position) = self.entries[..self.insert_index]
            .iter()
            .position(|entry| entry.id == id)
        else {
            crate::engine_warn!(%id, "pop_layer: layer not found");
            return None;
        };

        let mut entry = self.entries.remove(position);
        self.insert_index -= 1;
        entry.layer.on_detach();
        Some(entry.layer)
    }

    /// 从覆盖层区域移除 `id`
    ///
    /// `id` 不在覆盖层区域时记录警告并返回 `None`，层栈保持不变。
    pub fn pop_overlay(&mut self, id: LayerId) -> Option<Box<dyn Layer>> {
        let Some(offset) = self.entries[self.insert_index..]
            .iter()
            .position(|entry| entry.id == id)
        else {
            crate::engine_warn!(%id, "pop_overlay: overlay not found");
            return None;
        };

        let mut entry = self.entries.remove(self.insert_index + offset);
        entry.layer.on_detach();
        Some(entry.layer)
    }

    /// 按正向顺序更新所有层
    pub fn update(&mut self, timestep: Timestep) {
        for (_, layer) in self.iter_mut() {
            layer.on_update(timestep);
        }
    }

    /// 按正向顺序渲染所有层
    pub fn render(&mut self, renderer: &mut Renderer) {
        for (_, layer) in self.iter_mut() {
            layer.on_render(renderer);
        }
    }

    /// 自顶向下传递事件，直到某一层将其处理
    ///
    /// 返回事件最终是否已被处理。
    pub fn on_event(&mut self, event: &mut dyn Event) -> bool {
        for (_, layer) in self.iter_mut().rev() {
            if event.is_handled() {
                break;
            }
            if layer.on_event(event) {
                event.set_handled(true);
            }
        }
        event.is_handled()
    }

    /// 层的总数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 普通层数量
    pub fn layer_count(&self) -> usize {
        self.insert_index
    }

    /// 覆盖层数量
    pub fn overlay_count(&self) -> usize {
        self.entries.len() - self.insert_index
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn get(&self, id: LayerId) -> Option<&dyn Layer> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.layer.as_ref())
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut dyn Layer> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| entry.layer.as_mut() as &mut dyn Layer)
    }

    /// 按层栈顺序（自底向上）遍历；`.rev()` 得到自顶向下的顺序
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_> {
        IterMut {
            inner: self.entries.iter_mut(),
        }
    }

    fn allocate_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LayerStack {
    fn drop(&mut self) {
        // 自顶向下分离
        while let Some(mut entry) = self.entries.pop() {
            entry.layer.on_detach();
        }
        self.insert_index = 0;
    }
}

/// 层栈的只读迭代器
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, LayerEntry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (LayerId, &'a dyn Layer);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (entry.id, entry.layer.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|entry| (entry.id, entry.layer.as_ref()))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// 层栈的可变迭代器
pub struct IterMut<'a> {
    inner: std::slice::IterMut<'a, LayerEntry>,
}

impl<'a> Iterator for IterMut<'a> {
    type Item = (LayerId, &'a mut dyn Layer);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| (entry.id, entry.layer.as_mut() as &mut dyn Layer))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IterMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner
            .next_back()
            .map(|entry| (entry.id, entry.layer.as_mut() as &mut dyn Layer))
    }
}

impl ExactSizeIterator for IterMut<'_> {}
impl FusedIterator for IterMut<'_> {}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = (LayerId, &'a dyn Layer);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut LayerStack {
    type Item = (LayerId, &'a mut dyn Layer);
    type IntoIter = IterMut<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
