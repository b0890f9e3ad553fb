use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::Write;

use crate::config::ChartConfig;
use crate::layout::PolarSpan;

const EPSILON: f64 = 1e-12;

/// Pixel geometry of one annular sector. Angles follow the chart convention
/// (0 = 12 o'clock, clockwise); radii are in pixels from the chart center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Total angular gap shared by both sides of the sector
    pub pad_angle: f64,
    /// Radius at which the gap has its nominal angular width
    pub pad_radius: f64,
}

/// One circular edge of a sector, in screen angles (0 = +x, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub radius: f64,
    pub from: f64,
    pub to: f64,
}

impl Edge {
    pub fn point_at(&self, angle: f64) -> (f64, f64) {
        (self.radius * angle.cos(), self.radius * angle.sin())
    }

    pub fn start(&self) -> (f64, f64) {
        self.point_at(self.from)
    }

    pub fn end(&self) -> (f64, f64) {
        self.point_at(self.to)
    }

    pub fn sweep(&self) -> f64 {
        self.to - self.from
    }
}

/// Drawable outline of an arc after padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcOutline {
    /// Nothing to draw (zero outer radius)
    Empty,
    /// Full ring; `inner` of 0 means a filled disc
    Annulus { inner: f64, outer: f64 },
    /// Outer edge runs clockwise, inner edge back counter-clockwise.
    /// `inner` is None when the sector reaches the center.
    Sector { outer: Edge, inner: Option<Edge> },
}

impl ArcGeometry {
    /// Geometry for a polar span: inner radius `y0·R`, outer `y1·R` minus the
    /// ring gap (never below the inner radius), gap angle capped at half the
    /// span so thin slices keep a sliver.
    pub fn from_span(span: &PolarSpan, config: &ChartConfig) -> Self {
        let inner = span.y0 * config.radius;
        let outer = (span.y1 * config.radius - config.ring_gap).max(inner);
        Self {
            start_angle: span.x0,
            end_angle: span.x1,
            inner_radius: inner,
            outer_radius: outer,
            pad_angle: (span.angular_width() / 2.0).min(config.pad_angle),
            pad_radius: config.pad_radius,
        }
    }

    pub fn outline(&self) -> ArcOutline {
        let (mut r0, mut r1) = (self.inner_radius, self.outer_radius);
        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let a0 = self.start_angle - FRAC_PI_2;
        let a1 = self.end_angle - FRAC_PI_2;
        let da = (a1 - a0).abs();
        let dir = if a1 > a0 { 1.0 } else { -1.0 };

        if r1 <= EPSILON {
            return ArcOutline::Empty;
        }
        if da > TAU - EPSILON {
            return ArcOutline::Annulus {
                inner: r0,
                outer: r1,
            };
        }

        let (mut a00, mut a10, mut a01, mut a11) = (a0, a1, a0, a1);
        let half_pad = self.pad_angle / 2.0;
        if half_pad > EPSILON && self.pad_radius > EPSILON {
            let mid = (a0 + a1) / 2.0;
            // Inset each edge so the gap is a constant width at pad_radius.
            let inset = |r: f64| -> Option<f64> {
                let p = clamped_asin(self.pad_radius / r * half_pad.sin());
                (da - 2.0 * p > EPSILON).then_some(p * dir)
            };
            match inset(r0) {
                Some(p) => {
                    a00 += p;
                    a10 -= p;
                }
                None => {
                    a00 = mid;
                    a10 = mid;
                }
            }
            match inset(r1) {
                Some(p) => {
                    a01 += p;
                    a11 -= p;
                }
                None => {
                    a01 = mid;
                    a11 = mid;
                }
            }
        }

        let outer = Edge {
            radius: r1,
            from: a01,
            to: a11,
        };
        let inner = (r0 > EPSILON).then_some(Edge {
            radius: r0,
            from: a10,
            to: a00,
        });
        ArcOutline::Sector { outer, inner }
    }

    /// SVG path data for the outline, centered on the origin.
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        match self.outline() {
            ArcOutline::Empty => {}
            ArcOutline::Annulus { inner, outer } => {
                circle_path(&mut d, outer, true);
                if inner > EPSILON {
                    circle_path(&mut d, inner, false);
                }
            }
            ArcOutline::Sector { outer, inner } => {
                let (sx, sy) = outer.start();
                let _ = write!(d, "M{},{}", num(sx), num(sy));
                arc_to(&mut d, &outer);
                match inner {
                    Some(inner) => {
                        let (ix, iy) = inner.start();
                        let _ = write!(d, "L{},{}", num(ix), num(iy));
                        arc_to(&mut d, &inner);
                    }
                    None => d.push_str("L0,0"),
                }
                d.push('Z');
            }
        }
        d
    }

    /// Whether a point (relative to the chart center, y down) lies inside the
    /// padded sector, so clicks in the gap between neighbours hit neither.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let r = x.hypot(y);
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        let angle = chart_angle(x, y);
        if angle < self.start_angle || angle >= self.end_angle {
            return false;
        }
        let half_pad = self.pad_angle / 2.0;
        let da = self.end_angle - self.start_angle;
        if da > TAU - EPSILON || half_pad <= EPSILON || self.pad_radius <= EPSILON {
            return true;
        }
        // Same edge inset as `outline`: a gap of constant width at every radius.
        let inset = clamped_asin(self.pad_radius / r * half_pad.sin());
        angle - self.start_angle >= inset && self.end_angle - angle > inset
    }
}

/// Chart angle (0 = up, clockwise, in `[0, 2π)`) of a point relative to the center.
pub fn chart_angle(x: f64, y: f64) -> f64 {
    x.atan2(-y).rem_euclid(TAU)
}

fn clamped_asin(x: f64) -> f64 {
    if x >= 1.0 {
        FRAC_PI_2
    } else if x <= -1.0 {
        -FRAC_PI_2
    } else {
        x.asin()
    }
}

fn arc_to(d: &mut String, edge: &Edge) {
    let (ex, ey) = edge.end();
    let sweep = edge.sweep();
    let large = if sweep.abs() > PI { 1 } else { 0 };
    let clockwise = if sweep >= 0.0 { 1 } else { 0 };
    let r = num(edge.radius);
    let _ = write!(d, "A{},{},0,{},{},{},{}", r, r, large, clockwise, num(ex), num(ey));
}

/// A full circle as two half arcs, starting at 12 o'clock.
fn circle_path(d: &mut String, r: f64, clockwise: bool) {
    let sweep = if clockwise { 1 } else { 0 };
    let r_s = num(r);
    let top = num(-r);
    let bottom = num(r);
    let _ = write!(
        d,
        "M0,{top}A{r_s},{r_s},0,1,{sweep},0,{bottom}A{r_s},{r_s},0,1,{sweep},0,{top}Z"
    );
}

/// Compact number formatting for path data.
fn num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

/// Where a label sits: rotate to the arc's mid angle, push out to the mid
/// radius, and flip on the left half so text stays upright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Rotation in degrees, applied first
    pub rotate: f64,
    /// Distance from the center along the rotated x axis (px)
    pub distance: f64,
    /// Extra 180° turn for labels on the left half
    pub flip: bool,
}

impl LabelPlacement {
    pub fn for_span(span: &PolarSpan, radius: f64) -> Self {
        let mid_deg = ((span.x0 + span.x1) / 2.0).to_degrees();
        Self {
            rotate: mid_deg - 90.0,
            distance: (span.y0 + span.y1) / 2.0 * radius,
            flip: mid_deg >= 180.0,
        }
    }

    /// SVG transform attribute value.
    pub fn to_svg_transform(&self) -> String {
        format!(
            "rotate({}) translate({},0) rotate({})",
            num(self.rotate),
            num(self.distance),
            if self.flip { 180 } else { 0 }
        )
    }

    /// Label anchor relative to the chart center.
    pub fn anchor(&self) -> (f64, f64) {
        let theta = self.rotate.to_radians();
        (self.distance * theta.cos(), self.distance * theta.sin())
    }

    /// Total text rotation in radians.
    pub fn text_angle(&self) -> f64 {
        let flip = if self.flip { PI } else { 0.0 };
        self.rotate.to_radians() + flip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChartConfig {
        ChartConfig::with_width(600.0) // radius 100
    }

    #[test]
    fn radii_leave_a_one_pixel_gap() {
        let geo = ArcGeometry::from_span(&PolarSpan::new(0.0, 1.0, 1.0, 2.0), &config());
        assert_eq!(geo.inner_radius, 100.0);
        assert_eq!(geo.outer_radius, 199.0);
        assert_eq!(geo.pad_angle, 0.005);
    }

    #[test]
    fn collapsed_ring_keeps_outer_at_inner() {
        let geo = ArcGeometry::from_span(&PolarSpan::new(0.0, 1.0, 0.0, 0.0), &config());
        assert_eq!(geo.outer_radius, 0.0);
        assert_eq!(geo.outline(), ArcOutline::Empty);
    }

    #[test]
    fn thin_slice_pad_is_capped_at_half_span() {
        let geo = ArcGeometry::from_span(&PolarSpan::new(0.0, 0.004, 1.0, 2.0), &config());
        assert_eq!(geo.pad_angle, 0.002);
    }

    #[test]
    fn full_span_is_an_annulus() {
        let geo = ArcGeometry::from_span(&PolarSpan::new(0.0, TAU, 1.0, 2.0), &config());
        assert_eq!(
            geo.outline(),
            ArcOutline::Annulus {
                inner: 100.0,
                outer: 199.0
            }
        );
        let path = geo.to_svg_path();
        assert!(path.starts_with("M0,-199A199,199,0,1,1,0,199"));
        assert!(path.contains("M0,-100A100,100,0,1,0,0,100"));
    }

    #[test]
    fn padding_insets_both_edges() {
        let geo = ArcGeometry::from_span(&PolarSpan::new(0.0, FRAC_PI_2, 1.0, 2.0), &config());
        let ArcOutline::Sector { outer, inner } = geo.outline() else {
            panic!("expected a sector");
        };
        let inner = inner.unwrap();
        assert!(outer.from > -FRAC_PI_2);
        assert!(outer.to < 0.0);
        // Same linear gap, so the inner edge loses more angle.
        assert!(inner.to - (-FRAC_PI_2) > outer.from - (-FRAC_PI_2));
    }

    #[test]
    fn quarter_arc_path_shape() {
        let geo = ArcGeometry {
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            inner_radius: 10.0,
            outer_radius: 20.0,
            pad_angle: 0.0,
            pad_radius: 0.0,
        };
        assert_eq!(geo.to_svg_path(), "M0,-20A20,20,0,0,1,20,0L10,0A10,10,0,0,0,0,-10Z");
    }

    #[test]
    fn contains_uses_chart_angles() {
        let geo = ArcGeometry {
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            inner_radius: 10.0,
            outer_radius: 20.0,
            pad_angle: 0.0,
            pad_radius: 0.0,
        };
        // up-right quadrant
        assert!(geo.contains(10.0, -10.0));
        assert!(!geo.contains(-10.0, -10.0));
        assert!(!geo.contains(2.0, -2.0));
    }

    #[test]
    fn pad_gap_between_neighbours_hits_neither() {
        let config = ChartConfig::default();
        let left = ArcGeometry::from_span(&PolarSpan::new(0.0, FRAC_PI_2, 1.0, 2.0), &config);
        let right = ArcGeometry::from_span(&PolarSpan::new(FRAC_PI_2, PI, 1.0, 2.0), &config);
        // Half the gap is pad_radius * sin(pad / 2) = 250 * sin(0.0025), about 0.62px
        let r = 1.5 * config.radius;
        assert!(!left.contains(r, -0.3));
        assert!(!right.contains(r, 0.3));
        assert!(left.contains(r, -1.0));
        assert!(right.contains(r, 1.0));
        // Start of the first arc, next to 12 o'clock
        assert!(!left.contains(0.3, -r));
        assert!(left.contains(1.0, -r));
    }

    #[test]
    fn label_flips_on_left_half() {
        let right = LabelPlacement::for_span(&PolarSpan::new(0.0, PI, 1.0, 2.0), 100.0);
        assert!((right.rotate - 0.0).abs() < 1e-9);
        assert_eq!(right.distance, 150.0);
        assert!(!right.flip);
        assert_eq!(right.to_svg_transform(), "rotate(0) translate(150,0) rotate(0)");

        let left = LabelPlacement::for_span(&PolarSpan::new(PI, TAU, 1.0, 2.0), 100.0);
        assert!(left.flip);
        let (x, y) = left.anchor();
        assert!((x + 150.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }
}
