use glam::{Mat4, Quat, Vec2, Vec3};

/// Cursor displacements shorter than this are treated as no motion
const DRAG_EPSILON: f32 = 1e-4;

/// Below this, `up` is considered parallel to the view direction
const PARALLEL_EPSILON: f32 = 1e-4;

/// Smallest eye-to-target distance any settings can request
pub const MIN_DISTANCE_FLOOR: f32 = 1e-3;

/// Sensitivity and clamping parameters for a trackball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackballSettings {
    /// Multiplier on the arcball rotation angle
    pub rotation_scale: f32,
    /// Exponential zoom rate per unit of normalized cursor travel
    pub zoom_scale: f32,
    /// Pan distance per unit of cursor travel, relative to eye distance
    pub pan_scale: f32,
    /// Closest the eye may get to the target; must be positive
    pub min_distance: f32,
    /// Farthest the eye may get from the target
    pub max_distance: f32,
}

impl Default for TrackballSettings {
    fn default() -> Self {
        Self {
            rotation_scale: 1.0,
            zoom_scale: 1.5,
            pan_scale: 0.5,
            min_distance: 0.5,
            max_distance: 500.0,
        }
    }
}

impl TrackballSettings {
    /// Raise `min_distance` to [`MIN_DISTANCE_FLOOR`] and keep
    /// `max_distance >= min_distance`, so zoom clamping is always well formed
    pub fn sanitized(self) -> Self {
        let min_distance = self.min_distance.max(MIN_DISTANCE_FLOOR);
        Self {
            min_distance,
            max_distance: self.max_distance.max(min_distance),
            ..self
        }
    }
}

/// Reference frame captured when a drag begins
#[derive(Debug, Clone, Copy)]
struct Session {
    view: Mat4,
    start: Vec2,
    target: Vec3,
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    back: Vec3,
    distance: f32,
}

impl Session {
    fn new(view: Mat4, target: Vec3, start: Vec2) -> Self {
        let camera_to_world = view.inverse();
        let eye = camera_to_world.transform_point3(Vec3::ZERO);

        Self {
            view,
            start,
            target,
            eye,
            right: camera_to_world.transform_vector3(Vec3::X).normalize(),
            up: camera_to_world.transform_vector3(Vec3::Y).normalize(),
            back: camera_to_world.transform_vector3(Vec3::Z).normalize(),
            distance: eye.distance(target),
        }
    }

    /// Look-at matrix that falls back to the camera's own up axis when the
    /// supplied hint is degenerate
    fn look_at(&self, eye: Vec3, at: Vec3, up: Vec3) -> Mat4 {
        let forward = (at - eye).normalize_or(-self.back);
        let up = if up.cross(forward).length_squared() < PARALLEL_EPSILON {
            self.up
        } else {
            up
        };
        Mat4::look_at_rh(eye, at, up)
    }
}

/// Virtual trackball that turns 2D cursor drags into camera transforms.
///
/// Cursor positions are normalized device coordinates (see
/// [`crate::input::cursor_to_ndc`]). A drag is bracketed by [`begin`] and
/// [`end`]; every motion in between is measured against the state captured
/// at `begin`, so repeated updates never accumulate error.
///
/// [`begin`]: Trackball::begin
/// [`end`]: Trackball::end
#[derive(Debug, Clone, Default)]
pub struct Trackball {
    settings: TrackballSettings,
    session: Option<Session>,
}

impl Trackball {
    pub fn new(settings: TrackballSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            session: None,
        }
    }

    pub fn settings(&self) -> &TrackballSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: TrackballSettings) {
        self.settings = settings.sanitized();
    }

    /// Start a drag at `start` with `view` as the reference frame.
    /// `target` is the look-at point the rotation pivots around.
    pub fn begin(&mut self, view: Mat4, target: Vec3, start: Vec2) {
        let session = Session::new(view, target, start);
        log::debug!(
            "trackball: begin at ({:.3}, {:.3}), distance {:.3}",
            start.x,
            start.y,
            session.distance
        );
        self.session = Some(session);
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Rotation mode: arcball rotation from the start position to `current`
    /// about the target, applied to the start view matrix.
    ///
    /// Returns `None` outside a session.
    pub fn update(&self, current: Vec2) -> Option<Mat4> {
        let session = self.session.as_ref()?;

        if current.distance(session.start) < DRAG_EPSILON {
            return Some(session.view);
        }

        let from = project_to_sphere(session.start);
        let to = project_to_sphere(current);
        let (axis, angle) = Quat::from_rotation_arc(from, to).to_axis_angle();
        if angle.abs() < f32::EPSILON {
            return Some(session.view);
        }
        let rotation = Quat::from_axis_angle(axis, angle * self.settings.rotation_scale);

        // rotate the scene in eye space about the target's eye-space position
        let pivot = session.view.transform_point3(session.target);
        Some(
            Mat4::from_translation(pivot)
                * Mat4::from_quat(rotation)
                * Mat4::from_translation(-pivot)
                * session.view,
        )
    }

    /// Zoom mode: moves `eye` along the start view direction. Dragging up or
    /// right moves closer. Distance is clamped to the configured range, so
    /// the eye never reaches `at`.
    ///
    /// Returns `None` and leaves `eye` untouched outside a session.
    pub fn zooming(&self, current: Vec2, eye: &mut Vec3, at: Vec3, up: Vec3) -> Option<Mat4> {
        let session = self.session.as_ref()?;

        let travel = dominant_axis(current - session.start);
        let distance = (session.distance * (-travel * self.settings.zoom_scale).exp())
            .clamp(self.settings.min_distance, self.settings.max_distance);

        *eye = at + session.back * distance;
        Some(session.look_at(*eye, at, up))
    }

    /// Pan mode: translates `eye` and `at` together in the start camera's
    /// right/up plane, keeping the view direction and distance.
    ///
    /// Returns `None` and leaves both untouched outside a session.
    pub fn panning(
        &self,
        current: Vec2,
        eye: &mut Vec3,
        at: &mut Vec3,
        up: Vec3,
    ) -> Option<Mat4> {
        let session = self.session.as_ref()?;

        let travel = current - session.start;
        let reach = self.settings.pan_scale * session.distance.max(self.settings.min_distance);
        let offset = (session.right * travel.x + session.up * travel.y) * reach;

        *at = session.target - offset;
        *eye = session.eye - offset;
        Some(session.look_at(*eye, *at, up))
    }

    /// Finish the drag. `eye` and `at` are the final camera placement.
    pub fn end(&mut self, eye: Vec3, at: Vec3) {
        if self.session.take().is_some() {
            log::debug!(
                "trackball: end with eye ({:.2}, {:.2}, {:.2}) at ({:.2}, {:.2}, {:.2})",
                eye.x,
                eye.y,
                eye.z,
                at.x,
                at.y,
                at.z
            );
        }
    }
}

/// Shoemake arcball projection: points inside the unit disc lift onto the
/// front hemisphere, points outside land on its rim.
pub fn project_to_sphere(point: Vec2) -> Vec3 {
    let length_squared = point.length_squared();
    if length_squared <= 1.0 {
        point.extend((1.0 - length_squared).sqrt())
    } else {
        (point / length_squared.sqrt()).extend(0.0)
    }
}

fn dominant_axis(travel: Vec2) -> f32 {
    if travel.x.abs() > travel.y.abs() {
        travel.x
    } else {
        travel.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_view() -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, -10.0, 0.0), Vec3::ZERO, Vec3::Z)
    }

    #[test]
    fn test_project_center_is_pole() {
        assert_eq!(project_to_sphere(Vec2::ZERO), Vec3::Z);
    }

    #[test]
    fn test_project_stays_on_unit_sphere() {
        for point in [
            Vec2::new(0.3, -0.2),
            Vec2::new(0.99, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(-5.0, -5.0),
        ] {
            let projected = project_to_sphere(point);
            assert!((projected.length() - 1.0).abs() < 1e-5, "{:?}", projected);
            assert!(projected.z >= 0.0);
        }
    }

    #[test]
    fn test_project_outside_disc_lands_on_rim() {
        let projected = project_to_sphere(Vec2::new(3.0, 4.0));
        assert_eq!(projected.z, 0.0);
        assert!((projected.x - 0.6).abs() < 1e-6);
        assert!((projected.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_axis_prefers_larger_component() {
        assert_eq!(dominant_axis(Vec2::new(0.4, -0.1)), 0.4);
        assert_eq!(dominant_axis(Vec2::new(0.1, -0.4)), -0.4);
    }

    #[test]
    fn test_session_basis_is_orthonormal() {
        let session = Session::new(camera_view(), Vec3::ZERO, Vec2::ZERO);
        assert!(session.eye.abs_diff_eq(Vec3::new(0.0, -10.0, 0.0), 1e-4));
        assert!(session.back.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-5));
        assert!(session.up.abs_diff_eq(Vec3::Z, 1e-5));
        assert!(session.right.abs_diff_eq(Vec3::X, 1e-5));
        assert!((session.distance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_begin_and_end_toggle_tracking() {
        let mut trackball = Trackball::default();
        assert!(!trackball.is_tracking());

        trackball.begin(camera_view(), Vec3::ZERO, Vec2::ZERO);
        assert!(trackball.is_tracking());

        trackball.end(Vec3::new(0.0, -10.0, 0.0), Vec3::ZERO);
        assert!(!trackball.is_tracking());
    }

    #[test]
    fn test_rotation_scale_scales_angle() {
        let view = Mat4::IDENTITY;
        let target = Vec3::new(0.0, 0.0, -5.0);

        let mut single = Trackball::default();
        single.begin(view, target, Vec2::ZERO);
        let mut double = Trackball::new(TrackballSettings {
            rotation_scale: 2.0,
            ..Default::default()
        });
        double.begin(view, target, Vec2::ZERO);

        let angle = |m: Mat4| Quat::from_mat4(&m).to_axis_angle().1;
        let a = angle(single.update(Vec2::new(0.2, 0.0)).unwrap());
        let b = angle(double.update(Vec2::new(0.2, 0.0)).unwrap());
        assert!((b - 2.0 * a).abs() < 1e-4, "{} vs {}", a, b);
    }

    #[test]
    fn test_degenerate_up_falls_back_to_camera_up() {
        let mut trackball = Trackball::default();
        trackball.begin(camera_view(), Vec3::ZERO, Vec2::ZERO);

        let mut eye = Vec3::new(0.0, -10.0, 0.0);
        // up hint along the view direction
        let view = trackball
            .zooming(Vec2::new(0.0, 0.1), &mut eye, Vec3::ZERO, Vec3::Y)
            .unwrap();
        assert!(view.is_finite());
    }
}
