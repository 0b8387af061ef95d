use std::f32::consts::{PI, TAU};
use crate::types::Vertex;

/// Largest segment count along either grid axis. Keeps vertex indices and
/// buffer sizes well inside `u32`.
pub const MAX_TESSELLATION: u32 = 1024;

/// Indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Unit sphere around the origin with +Z as the pole axis.
///
/// `slices` runs around the equator, `stacks` from pole to pole. Seam and
/// pole vertices are duplicated so texture coordinates stay continuous.
pub fn sphere(slices: u32, stacks: u32) -> Mesh {
    let slices = slices.clamp(3, MAX_TESSELLATION);
    let stacks = stacks.clamp(2, MAX_TESSELLATION);

    let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
    for i in 0..=stacks {
        let theta = PI * i as f32 / stacks as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for j in 0..=slices {
            let phi = TAU * j as f32 / slices as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let position = [sin_theta * cos_phi, sin_theta * sin_phi, cos_theta];
            vertices.push(Vertex {
                position,
                normal: position,
                tex: [phi / TAU, 1.0 - theta / PI],
            });
        }
    }

    Mesh {
        vertices,
        indices: grid_indices(slices, stacks),
    }
}

/// Torus around +Z. `major` is the ring radius, `minor` the tube radius and
/// `height` squashes the tube along Z (1.0 is round, planetary rings use a
/// small value).
pub fn torus(major_segments: u32, minor_segments: u32, major: f32, minor: f32, height: f32) -> Mesh {
    let major_segments = major_segments.clamp(3, MAX_TESSELLATION);
    let minor_segments = minor_segments.clamp(3, MAX_TESSELLATION);
    let height = height.max(f32::EPSILON);

    let mut vertices = Vec::with_capacity(((major_segments + 1) * (minor_segments + 1)) as usize);
    for i in 0..=minor_segments {
        let phi = TAU * i as f32 / minor_segments as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=major_segments {
            let theta = TAU * j as f32 / major_segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let ring = major + minor * cos_phi;
            let normal = glam::Vec3::new(cos_phi * cos_theta, cos_phi * sin_theta, sin_phi / height)
                .normalize();
            vertices.push(Vertex {
                position: [ring * cos_theta, ring * sin_theta, height * minor * sin_phi],
                normal: normal.to_array(),
                tex: [theta / TAU, phi / TAU],
            });
        }
    }

    Mesh {
        vertices,
        indices: grid_indices(major_segments, minor_segments),
    }
}

/// Two triangles per cell of a (columns + 1) x (rows + 1) vertex grid
fn grid_indices(columns: u32, rows: u32) -> Vec<u32> {
    let stride = columns + 1;
    (0..rows)
        .flat_map(|i| {
            (0..columns).flat_map(move |j| {
                let a = i * stride + j;
                let b = a + stride;
                [a, b, a + 1, a + 1, b, b + 1]
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let mesh = sphere(72, 36);
        assert_eq!(mesh.vertices.len(), 73 * 37);
        assert_eq!(mesh.indices.len(), 72 * 36 * 6);
        assert_eq!(mesh.triangle_count(), 72 * 36 * 2);
    }

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        let mesh = sphere(16, 8);
        for vertex in &mesh.vertices {
            let p = glam::Vec3::from_array(vertex.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(vertex.position, vertex.normal);
            assert!((0.0..=1.0).contains(&vertex.tex[0]));
            assert!((0.0..=1.0).contains(&vertex.tex[1]));
        }
    }

    #[test]
    fn test_sphere_poles_on_z_axis() {
        let mesh = sphere(8, 4);
        assert!((mesh.vertices[0].position[2] - 1.0).abs() < 1e-6);
        assert!((mesh.vertices.last().unwrap().position[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_indices_in_range() {
        for mesh in [sphere(12, 6), torus(12, 6, 1.0, 0.2, 1.0)] {
            let count = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < count));
        }
    }

    #[test]
    fn test_low_tessellation_is_raised() {
        let mesh = sphere(0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert_eq!(mesh.triangle_count(), 3 * 2 * 2);
    }

    #[test]
    fn test_high_tessellation_is_capped() {
        let mesh = sphere(u32::MAX, 4);
        assert_eq!(mesh.vertices.len(), (MAX_TESSELLATION as usize + 1) * 5);
        assert_eq!(mesh.triangle_count(), MAX_TESSELLATION as usize * 4 * 2);

        let ring = torus(3, u32::MAX, 1.0, 0.3, 0.05);
        assert_eq!(ring.vertices.len(), 4 * (MAX_TESSELLATION as usize + 1));
    }

    #[test]
    fn test_torus_radii() {
        let mesh = torus(32, 16, 2.0, 0.5, 1.0);
        for vertex in &mesh.vertices {
            let p = glam::Vec3::from_array(vertex.position);
            let ring = p.truncate().length();
            assert!(ring >= 1.5 - 1e-4 && ring <= 2.5 + 1e-4);
            let tube = glam::Vec2::new(ring - 2.0, p.z).length();
            assert!((tube - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_flat_torus_normals_are_unit() {
        let mesh = torus(16, 8, 1.5, 0.4, 0.1);
        for vertex in &mesh.vertices {
            assert!(vertex.position[2].abs() <= 0.04 + 1e-6);
            let n = glam::Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }
}
