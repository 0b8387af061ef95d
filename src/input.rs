use std::collections::HashSet;
use glam::{UVec2, Vec2};
use winit::event::{MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MouseLeft,
    MouseRight,
    MouseMiddle,
    Shift,
    Control,
}

impl Button {
    /// Map Winit MouseButton to Button
    pub fn from_mouse(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }

    /// Map Winit KeyCode to a modifier Button
    pub fn from_keycode(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Button::Control),
            _ => None,
        }
    }
}

/// Window input the viewer reacts to, translated from Winit events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Mouse { button: Button, pressed: bool },
    Key { key: KeyCode, pressed: bool },
    /// Cursor position in physical pixels
    CursorMoved(Vec2),
    FocusLost,
}

impl InputEvent {
    /// Translate a Winit WindowEvent. Key repeats, unmapped mouse buttons and
    /// non-input events yield None.
    pub fn from_window_event(event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::Mouse {
                button: Button::from_mouse(*button)?,
                pressed: state.is_pressed(),
            }),
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => match event.physical_key {
                PhysicalKey::Code(key) => Some(InputEvent::Key {
                    key,
                    pressed: event.state.is_pressed(),
                }),
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(
            self,
            InputEvent::Mouse { pressed: false, .. } | InputEvent::Key { pressed: false, .. }
        )
    }
}

/// Controller - reports button states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons, in press order
    fn down_buttons(&self) -> &[Button];
}

/// Which camera operation a drag performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Zoom,
    Pan,
}

impl DragMode {
    /// Left drags rotate, zoom with Shift, pan with Ctrl.
    /// Right always zooms and middle always pans.
    pub fn select(button: Button, shift: bool, ctrl: bool) -> Option<DragMode> {
        match button {
            Button::MouseLeft if shift => Some(DragMode::Zoom),
            Button::MouseLeft if ctrl => Some(DragMode::Pan),
            Button::MouseLeft => Some(DragMode::Rotate),
            Button::MouseRight => Some(DragMode::Zoom),
            Button::MouseMiddle => Some(DragMode::Pan),
            Button::Shift | Button::Control => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DragMode::Rotate => "rotate",
            DragMode::Zoom => "zoom",
            DragMode::Pan => "pan",
        }
    }
}

/// Map a cursor position in pixels to normalized coordinates centered on
/// the viewport. The shorter viewport axis spans [-1, 1]; y points up.
pub fn cursor_to_ndc(cursor: Vec2, viewport: UVec2) -> Vec2 {
    let half = viewport.max(UVec2::ONE).as_vec2() * 0.5;
    let scale = half.min_element();
    Vec2::new((cursor.x - half.x) / scale, (half.y - cursor.y) / scale)
}

/// Pressed-button and cursor tracking
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Button>,
    /// Pressed buttons as a vec for `down_buttons`
    pressed_vec: Vec<Button>,
    /// Cursor position in physical pixels
    cursor: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            if self.pressed.insert(button) {
                self.pressed_vec.push(button);
            }
        } else if self.pressed.remove(&button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.pressed_vec.clear();
    }

    pub fn set_cursor(&mut self, cursor: Vec2) {
        self.cursor = Some(cursor);
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn shift(&self) -> bool {
        self.is_down(Button::Shift)
    }

    pub fn ctrl(&self) -> bool {
        self.is_down(Button::Control)
    }
}

impl Controller for InputState {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn down_buttons(&self) -> &[Button] {
        &self.pressed_vec
    }
}
