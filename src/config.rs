use std::time::Duration;

use crate::layout::VisibilityConfig;
use crate::tree::aggregate::ValueMode;

/// Chart geometry, styling and animation settings.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Side length of the square drawing area (px)
    pub width: f64,
    /// Width of one ring (px); the focus circle has this radius
    pub radius: f64,
    /// Upper bound for the angular gap between neighbouring arcs (rad)
    pub pad_angle: f64,
    /// Radius at which the pad angle is measured (px)
    pub pad_radius: f64,
    /// Gap left between consecutive rings (px)
    pub ring_gap: f64,
    pub visibility: VisibilityConfig,
    /// Arc fill opacity for companies with children
    pub branch_opacity: f32,
    /// Arc fill opacity for leaf companies
    pub leaf_opacity: f32,
    pub label_font_size: f32,
    pub center_font_size: f32,
    /// Zoom animation length
    pub duration: Duration,
    /// Zoom animation length with the alt modifier held
    pub slow_duration: Duration,
    pub value_mode: ValueMode,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::with_width(1000.0)
    }
}

impl ChartConfig {
    /// Defaults scaled to a drawing area `width` px wide: three visible rings
    /// plus the center circle fill the half-width.
    pub fn with_width(width: f64) -> Self {
        let radius = width / 6.0;
        Self {
            width,
            radius,
            pad_angle: 0.005,
            pad_radius: radius * 1.5,
            ring_gap: 1.0,
            visibility: VisibilityConfig::default(),
            branch_opacity: 0.6,
            leaf_opacity: 0.4,
            label_font_size: 10.0,
            center_font_size: 15.0,
            duration: Duration::from_millis(750),
            slow_duration: Duration::from_millis(7500),
            value_mode: ValueMode::Leaves,
        }
    }

    /// Animation length for a click, slowed down tenfold with alt held.
    pub fn transition_duration(&self, slow: bool) -> Duration {
        if slow {
            self.slow_duration
        } else {
            self.duration
        }
    }
}
