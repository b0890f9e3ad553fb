pub mod partition;
pub mod tween;
pub mod zoom;

use std::f64::consts::TAU;

pub use partition::partition;
pub use tween::{ease_cubic_in_out, Tween};
pub use zoom::{zoom_target, zoom_targets};

/// A node's polar extent: `x` is the angular span in radians (0 = 12 o'clock,
/// increasing clockwise), `y` the radial band in ring units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolarSpan {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PolarSpan {
    pub const FULL_RING: PolarSpan = PolarSpan {
        x0: 0.0,
        x1: TAU,
        y0: 0.0,
        y1: 1.0,
    };

    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    pub fn angular_width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn radial_width(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Linear interpolation of all four coordinates.
    pub fn lerp(&self, to: &PolarSpan, t: f64) -> PolarSpan {
        PolarSpan {
            x0: self.x0 + (to.x0 - self.x0) * t,
            x1: self.x1 + (to.x1 - self.x1) * t,
            y0: self.y0 + (to.y0 - self.y0) * t,
            y1: self.y1 + (to.y1 - self.y1) * t,
        }
    }

    /// Whether every coordinate is within `eps` of `other`.
    pub fn approx_eq(&self, other: &PolarSpan, eps: f64) -> bool {
        (self.x0 - other.x0).abs() <= eps
            && (self.x1 - other.x1).abs() <= eps
            && (self.y0 - other.y0).abs() <= eps
            && (self.y1 - other.y1).abs() <= eps
    }
}

/// Ring-band thresholds that decide what is drawn around the focus.
#[derive(Debug, Clone)]
pub struct VisibilityConfig {
    /// Outermost visible ring edge, in ring units
    pub max_ring: f64,
    /// Innermost visible ring edge; ring 0 belongs to the center circle
    pub min_ring: f64,
    /// Minimum angular × radial area for a label to be readable
    pub label_min_area: f64,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            max_ring: 3.0,
            min_ring: 1.0,
            label_min_area: 0.03,
        }
    }
}

impl VisibilityConfig {
    /// Only the rings immediately around the focus are shown.
    pub fn arc_visible(&self, s: &PolarSpan) -> bool {
        s.y1 <= self.max_ring && s.y0 >= self.min_ring && s.x1 > s.x0
    }

    pub fn label_visible(&self, s: &PolarSpan) -> bool {
        s.y1 <= self.max_ring
            && s.y0 >= self.min_ring
            && s.radial_width() * s.angular_width() > self.label_min_area
    }
}

/// `arc_visible` with the default three-ring window.
pub fn arc_visible(s: &PolarSpan) -> bool {
    VisibilityConfig::default().arc_visible(s)
}

/// `label_visible` with the default thresholds.
pub fn label_visible(s: &PolarSpan) -> bool {
    VisibilityConfig::default().label_visible(s)
}
