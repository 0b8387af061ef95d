pub mod app;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod config;
pub mod input;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod trackball;
pub mod types;

pub use camera::Camera;
pub use trackball::{Trackball, TrackballSettings};
