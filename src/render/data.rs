use crate::common::geodesy::CartesianPoint;

#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct LineVertex {
    pub position: [f32; 4],
}

impl LineVertex {
    pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        // position
        0 => Float32x4
    ];

    pub fn from_cartesian(point: CartesianPoint) -> Self {
        Self {
            position: [point.x as f32, point.y as f32, point.z as f32, 1.0],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-frame matrices, uploaded as one uniform block.
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct TransformState {
    pub model_view: glam::Mat4,
    pub projection: glam::Mat4,
    pub normal_model_view: glam::Mat4,
}

impl TransformState {
    pub const MODEL_VIEW_OFFSET: wgpu::BufferAddress = 0;
    pub const PROJECTION_OFFSET: wgpu::BufferAddress = 64;
    pub const NORMAL_MODEL_VIEW_OFFSET: wgpu::BufferAddress = 128;
    pub const SIZE: wgpu::BufferAddress = std::mem::size_of::<Self>() as wgpu::BufferAddress;

    /// The three matrices with the byte offset each is written to.
    pub fn regions(&self) -> [(wgpu::BufferAddress, &glam::Mat4); 3] {
        [
            (Self::MODEL_VIEW_OFFSET, &self.model_view),
            (Self::PROJECTION_OFFSET, &self.projection),
            (Self::NORMAL_MODEL_VIEW_OFFSET, &self.normal_model_view),
        ]
    }
}

#[cfg(test)]
mod tests {
    use glam::{DVec3, Mat4};

    use super::*;

    #[test]
    fn vertex_stride_is_four_floats() {
        assert_eq!(LineVertex::STRIDE, 16);
        assert_eq!(LineVertex::desc().array_stride, 16);
    }

    #[test]
    fn vertex_has_unit_w() {
        let vertex = LineVertex::from_cartesian(DVec3::new(-1.0, 0.5, 0.25));
        assert_eq!(vertex.position, [-1.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn uniform_layout_matches_offsets() {
        let state = TransformState {
            model_view: Mat4::from_scale(glam::Vec3::splat(1.0)),
            projection: Mat4::from_scale(glam::Vec3::splat(2.0)),
            normal_model_view: Mat4::from_scale(glam::Vec3::splat(3.0)),
        };
        assert_eq!(TransformState::SIZE, 192);

        let bytes = bytemuck::bytes_of(&state);
        state.regions().iter().for_each(|(offset, matrix)| {
            let offset = *offset as usize;
            assert_eq!(&bytes[offset..offset + 64], bytemuck::bytes_of(*matrix));
        });
    }
}
