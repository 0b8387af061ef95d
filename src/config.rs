use std::path::Path;
use anyhow::{ensure, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::camera::Camera;
use crate::mesh::MAX_TESSELLATION;
use crate::trackball::TrackballSettings;

/// Viewer configuration, loaded from JSON. Every field has a default so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub trackball: TrackballConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Trackball Viewer".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub at: [f32; 3],
    pub up: [f32; 3],
    pub fovy_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            eye: camera.eye.to_array(),
            at: camera.at.to_array(),
            up: camera.up.to_array(),
            fovy_degrees: camera.fovy.to_degrees(),
            near: camera.near,
            far: camera.far,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        let mut camera = Camera::new(
            Vec3::from_array(self.eye),
            Vec3::from_array(self.at),
            Vec3::from_array(self.up),
        );
        camera.fovy = self.fovy_degrees.to_radians();
        camera.near = self.near;
        camera.far = self.far;
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackballConfig {
    pub rotation_scale: f32,
    pub zoom_scale: f32,
    pub pan_scale: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for TrackballConfig {
    fn default() -> Self {
        let settings = TrackballSettings::default();
        Self {
            rotation_scale: settings.rotation_scale,
            zoom_scale: settings.zoom_scale,
            pan_scale: settings.pan_scale,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
        }
    }
}

impl TrackballConfig {
    pub fn settings(&self) -> TrackballSettings {
        TrackballSettings {
            rotation_scale: self.rotation_scale,
            zoom_scale: self.zoom_scale,
            pan_scale: self.pan_scale,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Sphere slices; stacks are half of this
    pub tessellation: u32,
    /// Start with orbit animation running
    pub orbit: bool,
    /// Animation seconds per wall-clock second
    pub time_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tessellation: 72,
            orbit: true,
            time_scale: 1.0,
        }
    }
}

impl ViewerConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        let window = &self.window;
        ensure!(window.width > 0 && window.height > 0, "window size must be positive");

        let camera = &self.camera;
        let eye = Vec3::from_array(camera.eye);
        let at = Vec3::from_array(camera.at);
        let up = Vec3::from_array(camera.up);
        ensure!(
            eye.is_finite() && at.is_finite() && up.is_finite(),
            "camera vectors must be finite"
        );
        ensure!(eye.distance(at) > 0.0, "camera eye and at must differ");
        ensure!(
            up.cross(at - eye).length_squared() > 1e-8,
            "camera up must not be parallel to the view direction"
        );
        ensure!(
            camera.fovy_degrees > 0.0 && camera.fovy_degrees < 180.0,
            "camera fovy_degrees must be in (0, 180), got {}",
            camera.fovy_degrees
        );
        ensure!(
            camera.near > 0.0 && camera.far > camera.near,
            "camera planes must satisfy 0 < near < far (near {}, far {})",
            camera.near,
            camera.far
        );

        let trackball = &self.trackball;
        ensure!(
            trackball.rotation_scale > 0.0 && trackball.zoom_scale > 0.0 && trackball.pan_scale > 0.0,
            "trackball scales must be positive"
        );
        ensure!(
            trackball.min_distance > 0.0 && trackball.max_distance > trackball.min_distance,
            "trackball distances must satisfy 0 < min_distance < max_distance (min {}, max {})",
            trackball.min_distance,
            trackball.max_distance
        );

        ensure!(
            (3..=MAX_TESSELLATION).contains(&self.scene.tessellation),
            "scene tessellation must be in 3..={}, got {}",
            MAX_TESSELLATION,
            self.scene.tessellation
        );
        ensure!(self.scene.time_scale >= 0.0, "scene time_scale must not be negative");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ViewerConfig::from_json(r#"{ "trackball": { "zoom_scale": 3.0 } }"#).unwrap();
        assert_eq!(config.trackball.zoom_scale, 3.0);
        assert_eq!(config.trackball.min_distance, TrackballSettings::default().min_distance);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = ViewerConfig::default();
        config.camera.eye = [1.0, 2.0, 3.0];
        config.scene.orbit = false;

        let text = config.to_json().unwrap();
        assert_eq!(ViewerConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = ViewerConfig::from_json("{ not json").unwrap_err();
        assert!(format!("{:#}", err).contains("parse"));
    }

    #[test]
    fn test_rejects_zero_min_distance() {
        let mut config = ViewerConfig::default();
        config.trackball.min_distance = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_distance"));
    }

    #[test]
    fn test_rejects_tessellation_out_of_range() {
        let mut config = ViewerConfig::default();
        config.scene.tessellation = 100_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tessellation"));

        config.scene.tessellation = MAX_TESSELLATION;
        assert!(config.validate().is_ok());
        config.scene.tessellation = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_camera() {
        let mut config = ViewerConfig::default();
        config.camera.at = config.camera.eye;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.camera.eye = [0.0, 0.0, 10.0];
        config.camera.at = [0.0, 0.0, 0.0];
        config.camera.up = [0.0, 0.0, 1.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_planes() {
        let mut config = ViewerConfig::default();
        config.camera.far = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_camera() {
        let mut config = CameraConfig::default();
        config.fovy_degrees = 60.0;
        let camera = config.build();
        assert!((camera.fovy - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.eye, Vec3::from_array(config.eye));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ViewerConfig::load(Path::new("/nonexistent/viewer.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
