//! 正交相机
//!
//! 管理 2D 场景的投影、视图以及两者的乘积（view-projection）。
//! `Renderer::begin_scene` 读取 view-projection 并在每次提交时上传。

use crate::core::math::{matrix, Matrix4, Vector3};

/// 正交相机
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    /// 投影矩阵
    projection: Matrix4,

    /// 视图矩阵（相机变换的逆）
    view: Matrix4,

    /// 投影 * 视图
    view_projection: Matrix4,

    /// 相机位置
    position: Vector3,

    /// 绕 Z 轴的旋转（弧度）
    rotation: f32,
}

impl OrthographicCamera {
    /// 创建正交相机，近/远平面固定为 -1/1
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let projection = matrix::orthographic(left, right, bottom, top, -1.0, 1.0);
        Self {
            projection,
            view: Matrix4::identity(),
            view_projection: projection,
            position: Vector3::zeros(),
            rotation: 0.0,
        }
    }

    /// 重新设置投影范围（例如窗口尺寸改变后）
    pub fn set_projection(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        self.projection = matrix::orthographic(left, right, bottom, top, -1.0, 1.0);
        self.view_projection = self.projection * self.view;
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.recalculate_view();
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.recalculate_view();
    }

    pub fn projection(&self) -> &Matrix4 {
        &self.projection
    }

    pub fn view(&self) -> &Matrix4 {
        &self.view
    }

    pub fn view_projection(&self) -> &Matrix4 {
        &self.view_projection
    }

    fn recalculate_view(&mut self) {
        let transform = matrix::translation(self.position.x, self.position.y, self.position.z)
            * matrix::rotation_z(self.rotation);

        // 平移与旋转组成的矩阵总是可逆的
        self.view = transform.try_inverse().unwrap_or_else(Matrix4::identity);
        self.view_projection = self.projection * self.view;
    }
}
