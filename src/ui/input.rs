#[cfg(feature = "gui")]
use winit::event::{ElementState, MouseButton};
#[cfg(feature = "gui")]
use winit::keyboard::{Key, NamedKey};

use crate::render::scene::SunburstScene;
use crate::tree::arena::NodeId;

/// Mouse state tracking, in window pixels.
#[derive(Debug, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_pressed: bool,
    /// Alt held: zoom transitions run slowly
    pub alt_held: bool,
}

/// Where the chart sits in the window: its center in window pixels and the
/// factor from chart pixels to window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartViewport {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl ChartViewport {
    /// Fit a square chart `chart_width` px wide into the window area right
    /// of `left_inset`, with a small margin.
    pub fn fit(window_w: f64, window_h: f64, left_inset: f64, chart_width: f64) -> Self {
        const MARGIN: f64 = 16.0;
        let avail_w = (window_w - left_inset - 2.0 * MARGIN).max(1.0);
        let avail_h = (window_h - 2.0 * MARGIN).max(1.0);
        Self {
            center_x: left_inset + MARGIN + avail_w / 2.0,
            center_y: MARGIN + avail_h / 2.0,
            scale: avail_w.min(avail_h) / chart_width.max(1.0),
        }
    }

    /// Window position to chart coordinates (origin at the chart center).
    pub fn to_chart(&self, x: f32, y: f32) -> (f64, f64) {
        (
            (x as f64 - self.center_x) / self.scale,
            (y as f64 - self.center_y) / self.scale,
        )
    }
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The center disc
    Center,
    /// A visible, interactive arc
    Arc(NodeId),
}

/// Hit-test a point given relative to the chart center. The center disc
/// sits on top of everything within the first ring.
pub fn hit_test(scene: &SunburstScene, x: f64, y: f64) -> Option<Hit> {
    if x.hypot(y) <= scene.center.radius {
        return Some(Hit::Center);
    }
    scene
        .arcs
        .iter()
        .find(|arc| arc.interactive && arc.geometry.contains(x, y))
        .map(|arc| Hit::Arc(arc.node))
}

/// Node a click at this point would zoom to, if any. Leaves do not react.
pub fn click_target(scene: &SunburstScene, x: f64, y: f64) -> Option<NodeId> {
    match hit_test(scene, x, y)? {
        Hit::Center => Some(scene.center.zoom_out_target),
        Hit::Arc(node) => scene.arc(node).filter(|a| a.clickable).map(|a| a.node),
    }
}

/// Input action produced from raw input events.
#[derive(Debug, PartialEq)]
pub enum InputAction {
    /// Mouse moved to new position
    Hover { x: f32, y: f32 },
    /// Left click at the current mouse position
    Click { x: f32, y: f32, slow: bool },
    /// Escape or backspace: same as clicking the center
    ZoomOut { slow: bool },
    /// Show the next root group
    NextRoot,
    /// Show the previous root group
    PreviousRoot,
    /// Open a different CSV file
    OpenFile,
    /// Window resized
    Resize { width: u32, height: u32 },
    /// No action
    None,
}

/// Process a mouse button event.
#[cfg(feature = "gui")]
pub fn process_mouse_button(
    button: MouseButton,
    state: ElementState,
    mouse: &MouseState,
) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match button {
        MouseButton::Left => InputAction::Click {
            x: mouse.x,
            y: mouse.y,
            slow: mouse.alt_held,
        },
        MouseButton::Back | MouseButton::Right => InputAction::ZoomOut {
            slow: mouse.alt_held,
        },
        _ => InputAction::None,
    }
}

/// Process a keyboard event.
#[cfg(feature = "gui")]
pub fn process_key(key: Key, state: ElementState, alt_held: bool) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match key.as_ref() {
        Key::Named(NamedKey::Backspace) | Key::Named(NamedKey::Escape) => {
            InputAction::ZoomOut { slow: alt_held }
        }
        Key::Named(NamedKey::ArrowRight) | Key::Named(NamedKey::ArrowDown) => {
            InputAction::NextRoot
        }
        Key::Named(NamedKey::ArrowLeft) | Key::Named(NamedKey::ArrowUp) => {
            InputAction::PreviousRoot
        }
        Key::Character("o") | Key::Character("O") => InputAction::OpenFile,
        _ => InputAction::None,
    }
}
