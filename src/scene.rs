use glam::{Mat4, Quat, Vec3};
use crate::types::InstanceData;

/// Planetary ring drawn with the shared torus mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    /// Torus scale relative to the planet radius
    pub scale: f32,
    /// Tilt about the X axis in radians
    pub tilt: f32,
    pub color: [f32; 4],
}

/// A sphere in the solar system. Orbits lie in the XY plane (+Z is up).
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: &'static str,
    pub radius: f32,
    pub orbit_radius: f32,
    /// Orbital angular speed in radians per animation second
    pub orbit_speed: f32,
    /// Spin angular speed in radians per animation second
    pub spin_speed: f32,
    /// Starting angle on the orbit
    pub phase: f32,
    pub color: [f32; 3],
    pub emissive: bool,
    /// Index of the body this one orbits; must precede it in the list
    pub parent: Option<usize>,
    pub ring: Option<Ring>,
}

impl Body {
    fn planet(name: &'static str, radius: f32, orbit_radius: f32, phase: f32, color: [f32; 3]) -> Self {
        Self {
            name,
            radius,
            orbit_radius,
            // Kepler-ish falloff keeps inner planets visibly faster
            orbit_speed: 4.0 / orbit_radius.powf(1.5),
            spin_speed: 1.0,
            phase,
            color,
            emissive: false,
            parent: None,
            ring: None,
        }
    }
}

/// Animated solar system: a sun, eight planets, a moon and two ringed
/// planets
#[derive(Debug, Clone)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    time: f32,
}

impl SolarSystem {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, time: 0.0 }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the animation clock
    pub fn advance(&mut self, delta: f32) {
        self.time += delta;
    }

    /// World-space center of every body at the current time
    pub fn positions(&self) -> Vec<Vec3> {
        let mut positions: Vec<Vec3> = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let origin = body
                .parent
                .and_then(|parent| positions.get(parent).copied())
                .unwrap_or(Vec3::ZERO);
            let angle = body.phase + body.orbit_speed * self.time;
            let (sin, cos) = angle.sin_cos();
            positions.push(origin + Vec3::new(cos, sin, 0.0) * body.orbit_radius);
        }
        positions
    }

    /// Sphere and ring instances for the current time
    pub fn instances(&self, texcoord_shading: bool) -> (Vec<InstanceData>, Vec<InstanceData>) {
        let positions = self.positions();
        let mut spheres = Vec::with_capacity(self.bodies.len());
        let mut rings = Vec::new();

        for (body, position) in self.bodies.iter().zip(positions) {
            let spin = Quat::from_rotation_z(body.spin_speed * self.time);
            let model = Mat4::from_scale_rotation_translation(Vec3::splat(body.radius), spin, position);
            spheres.push(InstanceData::new(
                model,
                [body.color[0], body.color[1], body.color[2], 1.0],
                body.emissive,
                texcoord_shading && !body.emissive,
            ));

            if let Some(ring) = body.ring {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::splat(body.radius * ring.scale),
                    Quat::from_rotation_x(ring.tilt),
                    position,
                );
                rings.push(InstanceData::new(model, ring.color, false, false));
            }
        }

        (spheres, rings)
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        let mut sun = Body::planet("Sun", 2.5, 0.0, 0.0, [1.0, 0.8, 0.3]);
        sun.orbit_speed = 0.0;
        sun.spin_speed = 0.2;
        sun.emissive = true;

        let mut moon = Body::planet("Moon", 0.15, 1.2, 0.0, [0.75, 0.75, 0.75]);
        moon.orbit_speed = 2.5;
        moon.parent = Some(3);

        let mut saturn = Body::planet("Saturn", 0.95, 19.0, 3.8, [0.9, 0.8, 0.55]);
        saturn.ring = Some(Ring {
            scale: 1.8,
            tilt: 0.45,
            color: [0.85, 0.75, 0.55, 0.5],
        });

        let mut uranus = Body::planet("Uranus", 0.7, 23.0, 5.2, [0.6, 0.85, 0.9]);
        uranus.ring = Some(Ring {
            scale: 1.6,
            tilt: 1.4,
            color: [0.7, 0.85, 0.9, 0.5],
        });

        Self::new(vec![
            sun,
            Body::planet("Mercury", 0.25, 4.5, 0.4, [0.6, 0.55, 0.5]),
            Body::planet("Venus", 0.45, 6.5, 1.9, [0.9, 0.75, 0.45]),
            Body::planet("Earth", 0.5, 8.5, 3.1, [0.25, 0.45, 0.9]),
            Body::planet("Mars", 0.35, 10.5, 4.4, [0.8, 0.35, 0.2]),
            Body::planet("Jupiter", 1.2, 14.5, 0.9, [0.85, 0.7, 0.55]),
            saturn,
            uranus,
            Body::planet("Neptune", 0.7, 27.0, 2.5, [0.3, 0.4, 0.95]),
            moon,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_layout() {
        let scene = SolarSystem::default();
        let bodies = scene.bodies();
        assert_eq!(bodies.len(), 10);
        assert!(bodies[0].emissive);
        assert_eq!(bodies.iter().filter(|b| b.ring.is_some()).count(), 2);
        for (index, body) in bodies.iter().enumerate() {
            if let Some(parent) = body.parent {
                assert!(parent < index, "{} orbits a later body", body.name);
            }
        }
    }

    #[test]
    fn test_positions_follow_orbit_radius() {
        let mut scene = SolarSystem::default();
        scene.advance(12.3);
        let positions = scene.positions();

        assert_eq!(positions[0], Vec3::ZERO);
        for (body, position) in scene.bodies().iter().zip(&positions) {
            if body.parent.is_none() {
                assert!((position.length() - body.orbit_radius).abs() < 1e-3);
                assert_eq!(position.z, 0.0);
            }
        }
    }

    #[test]
    fn test_moon_tracks_parent() {
        let mut scene = SolarSystem::default();
        for _ in 0..5 {
            scene.advance(0.7);
            let positions = scene.positions();
            let moon = scene.bodies().iter().position(|b| b.name == "Moon").unwrap();
            let parent = scene.bodies()[moon].parent.unwrap();
            let separation = positions[moon].distance(positions[parent]);
            assert!((separation - 1.2).abs() < 1e-3);
        }
    }

    #[test]
    fn test_advance_moves_planets() {
        let mut scene = SolarSystem::default();
        let before = scene.positions();
        scene.advance(1.0);
        let after = scene.positions();

        assert_eq!(before[0], after[0]);
        assert!(before[3].distance(after[3]) > 0.01);
    }

    #[test]
    fn test_instances_split_spheres_and_rings() {
        let scene = SolarSystem::default();
        let (spheres, rings) = scene.instances(true);
        assert_eq!(spheres.len(), 10);
        assert_eq!(rings.len(), 2);

        // sun is never texcoord shaded
        assert!(spheres[0].is_emissive());
        assert_eq!(spheres[0].shading[1], 0.0);
        assert_eq!(spheres[3].shading[1], 1.0);
        assert!(rings.iter().all(|r| r.color[3] < 1.0));
    }
}
