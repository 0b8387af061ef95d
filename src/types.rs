/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub _pad: f32,
}

/// Mesh vertex: position, normal, texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance data for one drawn body or ring
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: emissive (1.0 skips lighting), y: texcoord shading
    pub shading: [f32; 2],
}

impl InstanceData {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x2
    ];

    pub fn new(model: glam::Mat4, color: [f32; 4], emissive: bool, texcoord_shading: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            shading: [
                if emissive { 1.0 } else { 0.0 },
                if texcoord_shading { 1.0 } else { 0.0 },
            ],
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.shading[0] > 0.5
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::size_of::<InstanceData>(), 88);
    }

    #[test]
    fn test_instance_flags() {
        let sun = InstanceData::new(glam::Mat4::IDENTITY, [1.0; 4], true, false);
        assert!(sun.is_emissive());
        assert_eq!(sun.shading, [1.0, 0.0]);

        let planet = InstanceData::new(glam::Mat4::IDENTITY, [1.0; 4], false, true);
        assert!(!planet.is_emissive());
        assert_eq!(planet.shading, [0.0, 1.0]);
    }
}
