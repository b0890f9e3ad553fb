use std::f64::consts::PI;

use vello::kurbo::{Affine, Arc, BezPath, Circle, Point, Shape, Vec2};
use vello::peniko::{Color, Fill};
use vello::Scene;

use super::arc::{ArcOutline, Edge};
use super::scene::{ArcPrimitive, LabelPrimitive, SunburstScene};
use super::text::{TextRenderResult, TextRenderer};
use crate::ui::input::ChartViewport;

const TOLERANCE: f64 = 0.1;
const LABEL_COLOR: [u8; 3] = [0, 0, 0];

/// Paint the chart into a vello scene at the given viewport. Arcs first,
/// then labels, then the center label; the center disc itself has no fill.
pub fn paint_chart(
    scene: &mut Scene,
    chart: &SunburstScene,
    viewport: &ChartViewport,
    text_renderer: &mut TextRenderer,
) {
    let base = Affine::translate((viewport.center_x, viewport.center_y))
        * Affine::scale(viewport.scale);

    for arc in chart.visible_arcs() {
        paint_arc(scene, arc, base);
    }

    for label in chart.visible_labels() {
        paint_label(scene, label, base, viewport.scale, text_renderer);
    }

    let size = chart.center.font_size * viewport.scale as f32;
    if let Some(text) =
        text_renderer.render_text(&chart.center.label, "default", size, None, LABEL_COLOR)
    {
        let transform = Affine::translate((viewport.center_x, viewport.center_y));
        draw_centered(scene, &text, transform);
    }
}

fn paint_arc(scene: &mut Scene, arc: &ArcPrimitive, base: Affine) {
    let Some((path, fill)) = outline_path(&arc.geometry.outline()) else {
        return;
    };
    let opacity = if arc.hovered {
        (arc.opacity + 0.2).min(1.0)
    } else {
        arc.opacity
    };
    let color = arc.fill.with_alpha(opacity).to_peniko();
    scene.fill(fill, base, color, None, &path);
}

fn paint_label(
    scene: &mut Scene,
    label: &LabelPrimitive,
    base: Affine,
    scale: f64,
    text_renderer: &mut TextRenderer,
) {
    // Rasterize at the on-screen size so glyphs stay crisp, then place in
    // unscaled window pixels along the rotated label frame.
    let size = label.font_size * scale as f32;
    let Some(text) = text_renderer.render_text(&label.text, "default", size, None, LABEL_COLOR)
    else {
        return;
    };
    let (ax, ay) = label.placement.anchor();
    let anchor = base * Point::new(ax, ay);
    let transform = Affine::translate(anchor.to_vec2()) * Affine::rotate(label.placement.text_angle());
    draw_centered(scene, &text, transform);
}

/// Draw text centered on the origin of `transform`.
fn draw_centered(scene: &mut Scene, text: &TextRenderResult, transform: Affine) {
    let offset = Affine::translate((-(text.width as f64) / 2.0, -(text.height as f64) / 2.0));
    for glyph in &text.glyphs {
        let at = Affine::translate((glyph.x as f64, glyph.y as f64));
        scene.draw_image(&glyph.image, transform * offset * at);
    }
}

/// Vector path for an arc outline, with the fill rule it needs.
fn outline_path(outline: &ArcOutline) -> Option<(BezPath, Fill)> {
    match *outline {
        ArcOutline::Empty => None,
        ArcOutline::Annulus { inner, outer } => {
            let mut path = Circle::new(Point::ZERO, outer).to_path(TOLERANCE);
            if inner > 0.0 {
                path.extend(Circle::new(Point::ZERO, inner).path_elements(TOLERANCE));
            }
            Some((path, Fill::EvenOdd))
        }
        ArcOutline::Sector { outer, inner } => {
            let mut path = BezPath::new();
            let (sx, sy) = outer.start();
            path.move_to((sx, sy));
            append_edge(&mut path, &outer);
            match inner {
                Some(inner) => {
                    let (ix, iy) = inner.start();
                    path.line_to((ix, iy));
                    append_edge(&mut path, &inner);
                }
                None => path.line_to(Point::ZERO),
            }
            path.close_path();
            Some((path, Fill::NonZero))
        }
    }
}

fn append_edge(path: &mut BezPath, edge: &Edge) {
    let sweep = edge.sweep();
    if sweep.abs() < 1e-9 {
        return;
    }
    let arc = Arc::new(
        Point::ZERO,
        Vec2::new(edge.radius, edge.radius),
        edge.from,
        sweep.clamp(-2.0 * PI, 2.0 * PI),
        0.0,
    );
    path.extend(arc.append_iter(TOLERANCE));
}

/// Plain backdrop color behind the chart.
pub fn background() -> Color {
    Color::WHITE
}
