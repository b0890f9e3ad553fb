use compact_str::CompactString;
use vello::kurbo::{Affine, Rect};
use vello::peniko::{Color, Fill};
use vello::Scene;

use crate::render::text::{TextRenderResult, TextRenderer};
use crate::ui::tooltip::TooltipInfo;

const SIDEBAR_WIDTH: f32 = 196.0;
const ROW_H: f32 = 26.0;
const MAX_ROWS: usize = 20;
const LIGHT_TEXT: [u8; 3] = [235, 237, 242];

#[derive(Debug, Clone, PartialEq)]
pub enum SidebarHitId {
    SelectRoot(usize),
    OpenFile,
}

#[derive(Debug, Clone)]
pub struct SidebarHitRegion {
    pub id: SidebarHitId,
    pub bounds: [f32; 4],
}

/// Horizontal space the sidebar takes away from the chart.
pub fn sidebar_inset() -> f32 {
    SIDEBAR_WIDTH + 16.0
}

/// Hit-test the regions returned by `render_left_sidebar`.
pub fn hit_test_sidebar(regions: &[SidebarHitRegion], x: f32, y: f32) -> Option<SidebarHitId> {
    regions
        .iter()
        .rev()
        .find(|r| {
            let [x1, y1, x2, y2] = r.bounds;
            x >= x1 && x <= x2 && y >= y1 && y <= y2
        })
        .map(|r| r.id.clone())
}

/// Root group picker on the left. Returns the clickable regions.
pub fn render_left_sidebar(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    viewport_height: f32,
    roots: &[CompactString],
    selected: Option<usize>,
) -> Vec<SidebarHitRegion> {
    let visible = roots.len().min(MAX_ROWS);
    let panel_h = (14.0 + 22.0 + visible as f32 * (ROW_H + 6.0) + 8.0 + 34.0 + 8.0)
        .min((viewport_height - 16.0).max(32.0));
    let [x1, y1, x2, y2] = [8.0, 8.0, 8.0 + SIDEBAR_WIDTH, 8.0 + panel_h];
    let mut hits = Vec::new();

    fill_rect(scene, [x1, y1, x2, y2], Color::new([0.10, 0.11, 0.13, 0.86]));

    let mut y = y1 + 8.0;
    draw_label(scene, text_renderer, "Root groups", x1 + 6.0, y, 14.0);
    y += 22.0;

    // Keep the selected row in view when there are more groups than rows.
    let first = selected
        .map(|s| s.saturating_sub(MAX_ROWS - 1))
        .unwrap_or(0)
        .min(roots.len().saturating_sub(visible));
    for (index, root) in roots.iter().enumerate().skip(first).take(visible) {
        let bounds = [x1 + 2.0, y, x2 - 2.0, y + ROW_H];
        let fill = if selected == Some(index) {
            Color::new([0.23, 0.30, 0.42, 0.86])
        } else {
            Color::new([0.16, 0.17, 0.20, 0.70])
        };
        fill_rect(scene, bounds, fill);
        draw_label(scene, text_renderer, root, bounds[0] + 8.0, y + 5.0, 14.0);
        hits.push(SidebarHitRegion {
            id: SidebarHitId::SelectRoot(index),
            bounds,
        });
        y += ROW_H + 6.0;
    }

    y += 8.0;
    let open = [x1 + 2.0, y, x2 - 2.0, y + 28.0];
    fill_rect(scene, open, Color::new([0.16, 0.17, 0.20, 0.78]));
    draw_label(scene, text_renderer, "Open CSV… (O)", open[0] + 8.0, y + 6.0, 14.0);
    hits.push(SidebarHitRegion {
        id: SidebarHitId::OpenFile,
        bounds: open,
    });

    hits
}

/// Hover tooltip next to the pointer, flipped to stay inside the window.
pub fn render_tooltip(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    info: &TooltipInfo,
    mouse_x: f32,
    mouse_y: f32,
    viewport_width: f32,
    viewport_height: f32,
) {
    let lines = info.lines();
    let rendered: Vec<TextRenderResult> = lines
        .iter()
        .filter_map(|line| text_renderer.render_text(line, "default", 13.0, None, LIGHT_TEXT))
        .collect();
    if rendered.is_empty() {
        return;
    }

    let line_h = 18.0;
    let width = rendered.iter().map(|r| r.width).fold(0.0, f32::max) + 16.0;
    let height = rendered.len() as f32 * line_h + 10.0;
    let mut x = mouse_x + 15.0;
    let mut y = mouse_y + 15.0;
    if x + width > viewport_width {
        x = mouse_x - width - 15.0;
    }
    if y + height > viewport_height {
        y = mouse_y - height - 15.0;
    }

    fill_rect(scene, [x, y, x + width, y + height], Color::new([0.15, 0.15, 0.18, 0.95]));
    for (i, text) in rendered.iter().enumerate() {
        draw_text(scene, text, x + 8.0, y + 5.0 + i as f32 * line_h);
    }
}

/// Centered notice for an empty or blank chart.
pub fn render_message(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    message: &str,
    center_x: f32,
    center_y: f32,
) {
    let max_width = 520.0;
    let Some(text) = text_renderer.render_text(message, "default", 15.0, Some(max_width), [40, 40, 48])
    else {
        return;
    };
    let x = center_x - text.width / 2.0;
    let y = center_y - text.height / 2.0;
    fill_rect(
        scene,
        [x - 14.0, y - 10.0, x + text.width + 14.0, y + text.height + 10.0],
        Color::new([0.94, 0.94, 0.96, 1.0]),
    );
    draw_text(scene, &text, x, y);
}

fn fill_rect(scene: &mut Scene, [x1, y1, x2, y2]: [f32; 4], color: Color) {
    let rect = Rect::new(x1 as f64, y1 as f64, x2 as f64, y2 as f64);
    scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &rect);
}

fn draw_text(scene: &mut Scene, text: &TextRenderResult, x: f32, y: f32) {
    let origin = Affine::translate((x.round() as f64, y.round() as f64));
    for glyph in &text.glyphs {
        let at = Affine::translate((glyph.x.round() as f64, glyph.y.round() as f64));
        scene.draw_image(&glyph.image, origin * at);
    }
}

fn draw_label(
    scene: &mut Scene,
    text_renderer: &mut TextRenderer,
    text: &str,
    x: f32,
    y: f32,
    font_size: f32,
) {
    if let Some(rendered) =
        text_renderer.render_text(text, "default", font_size, Some(SIDEBAR_WIDTH - 20.0), LIGHT_TEXT)
    {
        draw_text(scene, &rendered, x, y);
    }
}
