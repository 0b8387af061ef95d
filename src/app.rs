//! Application context: owns the camera, trackball, input and scene state
//! and implements the viewer's input handlers.

use glam::{UVec2, Vec2, Vec3};
use winit::keyboard::KeyCode;
use crate::camera::Camera;
use crate::clock::FpsCounter;
use crate::config::ViewerConfig;
use crate::input::{cursor_to_ndc, Button, DragMode, InputEvent, InputState};
use crate::scene::SolarSystem;
use crate::trackball::Trackball;

pub const HELP: &str = "\
[help]
- press ESC or 'q' to terminate the program
- press F1 or 'h' to see help
- press Home to reset camera
- press 'r' to toggle orbit animation
- press 'w' to toggle wireframe
- press 't' to toggle planetary rings
- press 'd' to toggle texture-coordinate shading
- left drag to rotate, right or shift+left drag to zoom
- middle or ctrl+left drag to pan
";

/// Keyboard command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    ResetCamera,
    ToggleOrbit,
    ToggleWireframe,
    ToggleRings,
    ToggleTexcoords,
}

impl Action {
    pub fn from_key(key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Escape | KeyCode::KeyQ => Some(Action::Quit),
            KeyCode::KeyH | KeyCode::F1 => Some(Action::Help),
            KeyCode::Home => Some(Action::ResetCamera),
            KeyCode::KeyR => Some(Action::ToggleOrbit),
            KeyCode::KeyW => Some(Action::ToggleWireframe),
            KeyCode::KeyT => Some(Action::ToggleRings),
            KeyCode::KeyD => Some(Action::ToggleTexcoords),
            _ => None,
        }
    }
}

/// Render toggles flipped from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub orbit: bool,
    pub wireframe: bool,
    pub rings: bool,
    pub texcoords: bool,
}

/// Snapshot of viewer state for the HUD overlay
#[derive(Debug, Clone, PartialEq)]
pub struct HudInfo {
    pub fps: f32,
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    pub distance: f32,
    pub drag: Option<DragMode>,
    pub toggles: Toggles,
    pub bodies: usize,
    pub viewport: UVec2,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    button: Button,
    mode: DragMode,
}

/// All mutable viewer state, passed to event handlers instead of globals.
/// The main thread is the only writer.
pub struct AppContext {
    pub camera: Camera,
    home: Camera,
    trackball: Trackball,
    input: InputState,
    drag: Option<Drag>,
    viewport: UVec2,
    pub scene: SolarSystem,
    pub toggles: Toggles,
    time_scale: f32,
    fps: FpsCounter,
    exit_requested: bool,
}

impl AppContext {
    pub fn new(config: &ViewerConfig) -> Self {
        let viewport = UVec2::new(config.window.width, config.window.height);
        let mut camera = config.camera.build();
        camera.set_viewport(viewport.x, viewport.y);

        Self {
            home: camera.clone(),
            camera,
            trackball: Trackball::new(config.trackball.settings()),
            input: InputState::new(),
            drag: None,
            viewport,
            scene: SolarSystem::default(),
            toggles: Toggles {
                orbit: config.scene.orbit,
                wireframe: false,
                rings: true,
                texcoords: false,
            },
            time_scale: config.scene.time_scale,
            fps: FpsCounter::default(),
            exit_requested: false,
        }
    }

    pub fn trackball(&self) -> &Trackball {
        &self.trackball
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.map(|drag| drag.mode)
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn cursor_ndc(&self) -> Vec2 {
        let cursor = self.input.cursor().unwrap_or(self.viewport.as_vec2() * 0.5);
        cursor_to_ndc(cursor, self.viewport)
    }

    /// Route a translated window event to its handler. Returns the keyboard
    /// action that ran, if any.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::Mouse { button, pressed } => self.on_mouse_button(button, pressed),
            InputEvent::Key { key, pressed } => return self.on_key(key, pressed),
            InputEvent::CursorMoved(position) => self.on_cursor_moved(position),
            InputEvent::FocusLost => self.on_focus_lost(),
        }
        None
    }

    /// Whether `event` must reach this context even when the HUD consumed it.
    /// Releases and focus loss always do, and an active drag owns the pointer
    /// until its button comes up.
    pub fn overrides_hud(&self, event: &InputEvent) -> bool {
        event.is_release() || *event == InputEvent::FocusLost || self.drag.is_some()
    }

    /// Mouse press starts a drag whose mode is fixed by the button and the
    /// modifiers held at that moment; releasing that button ends it.
    pub fn on_mouse_button(&mut self, button: Button, pressed: bool) {
        self.input.set(button, pressed);

        if pressed {
            if self.drag.is_some() {
                return;
            }
            let Some(mode) = DragMode::select(button, self.input.shift(), self.input.ctrl()) else {
                return;
            };
            self.trackball
                .begin(self.camera.view_matrix, self.camera.at, self.cursor_ndc());
            self.drag = Some(Drag { button, mode });
            log::debug!("{} drag started", mode.label());
        } else if self.drag.is_some_and(|drag| drag.button == button) {
            self.end_drag();
        }
    }

    fn end_drag(&mut self) {
        self.trackball.end(self.camera.eye, self.camera.at);
        self.drag = None;
    }

    /// Cursor motion in physical pixels; applies the active drag
    pub fn on_cursor_moved(&mut self, position: Vec2) {
        self.input.set_cursor(position);

        let Some(drag) = self.drag else {
            return;
        };
        if !self.trackball.is_tracking() {
            return;
        }

        let ndc = self.cursor_ndc();
        let camera = &mut self.camera;
        match drag.mode {
            DragMode::Rotate => {
                if let Some(view) = self.trackball.update(ndc) {
                    camera.set_view(view);
                }
            }
            DragMode::Zoom => {
                if let Some(view) = self.trackball.zooming(ndc, &mut camera.eye, camera.at, camera.up) {
                    camera.view_matrix = view;
                }
            }
            DragMode::Pan => {
                if let Some(view) =
                    self.trackball
                        .panning(ndc, &mut camera.eye, &mut camera.at, camera.up)
                {
                    camera.view_matrix = view;
                }
            }
        }
    }

    /// Keyboard input. Modifier keys update the input state; other keys run
    /// their action on press. Returns the action that ran.
    pub fn on_key(&mut self, key: KeyCode, pressed: bool) -> Option<Action> {
        if let Some(button) = Button::from_keycode(key) {
            self.input.set(button, pressed);
            return None;
        }
        if !pressed {
            return None;
        }

        let action = Action::from_key(key)?;
        match action {
            Action::Quit => self.exit_requested = true,
            Action::Help => println!("{}", HELP),
            Action::ResetCamera => {
                if self.trackball.is_tracking() {
                    self.end_drag();
                }
                let aspect = self.camera.aspect;
                self.camera = self.home.clone();
                self.camera.aspect = aspect;
                log::info!("> camera reset");
            }
            Action::ToggleOrbit => {
                self.toggles.orbit = !self.toggles.orbit;
                log::info!("> {}", if self.toggles.orbit { "rotate" } else { "stop" });
            }
            Action::ToggleWireframe => {
                self.toggles.wireframe = !self.toggles.wireframe;
                log::info!(
                    "> using {} mode",
                    if self.toggles.wireframe { "wireframe" } else { "solid" }
                );
            }
            Action::ToggleRings => {
                self.toggles.rings = !self.toggles.rings;
                log::info!("> {}", if self.toggles.rings { "rings" } else { "no rings" });
            }
            Action::ToggleTexcoords => {
                self.toggles.texcoords = !self.toggles.texcoords;
                log::info!(
                    "> {}",
                    if self.toggles.texcoords { "texcoord shading" } else { "solid color" }
                );
            }
        }
        Some(action)
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = UVec2::new(width, height);
        self.camera.set_viewport(width, height);
    }

    /// Window lost focus: drop held buttons and any drag in progress
    pub fn on_focus_lost(&mut self) {
        self.input.release_all();
        if self.trackball.is_tracking() {
            self.end_drag();
        }
    }

    /// Per-frame update with wall-clock delta in seconds
    pub fn tick(&mut self, delta: f32) {
        if self.fps.tick(delta) {
            log::trace!("FPS: {:.1}", self.fps.fps());
        }
        if self.toggles.orbit {
            self.scene.advance(delta * self.time_scale);
        }
    }

    pub fn hud(&self) -> HudInfo {
        HudInfo {
            fps: self.fps.fps(),
            eye: self.camera.eye,
            at: self.camera.at,
            up: self.camera.up,
            distance: self.camera.distance(),
            drag: self.drag_mode(),
            toggles: self.toggles,
            bodies: self.scene.bodies().len(),
            viewport: self.viewport,
        }
    }
}
