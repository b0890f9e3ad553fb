use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use svg::node::element::{Circle, Element, Group, Path as SvgPath, Text};
use svg::node::Text as SvgText;
use svg::{Document, Node};

use super::scene::{ArcPrimitive, LabelPrimitive, SunburstScene};

/// Serialise a scene as a standalone SVG document centered on the origin.
pub fn scene_to_svg_document(scene: &SunburstScene) -> Document {
    let w = scene.width;
    let mut document = Document::new()
        .set("viewBox", format!("{} {} {} {}", -w / 2.0, -w / 2.0, w, w))
        .set("width", w)
        .set("height", w)
        .set("style", "max-width: 100%; height: auto; font: 10px sans-serif;")
        .set("xmlns", "http://www.w3.org/2000/svg");

    let mut arcs = Group::new();
    for arc in &scene.arcs {
        arcs = arcs.add(arc_path(arc));
    }
    document = document.add(arcs);

    document = document.add(
        Text::new(scene.center.label.clone())
            .set("text-anchor", "middle")
            .set("dy", "0.35em")
            .set("font-size", scene.center.font_size),
    );

    let mut labels = Group::new()
        .set("pointer-events", "none")
        .set("text-anchor", "middle")
        .set("style", "user-select: none;");
    for label in &scene.labels {
        labels = labels.add(label_text(label));
    }
    document = document.add(labels);

    document.add(
        Circle::new()
            .set("r", scene.center.radius)
            .set("fill", "none")
            .set("pointer-events", "all"),
    )
}

fn arc_path(arc: &ArcPrimitive) -> SvgPath {
    let mut title = Element::new("title");
    title.append(SvgText::new(arc.tooltip.clone()));

    let mut node = SvgPath::new()
        .set("fill", arc.fill.to_hex())
        .set("fill-opacity", arc.opacity)
        .set("pointer-events", if arc.interactive { "auto" } else { "none" })
        .set("d", arc.geometry.to_svg_path());
    if arc.clickable {
        node = node.set("style", "cursor: pointer;");
    }
    node.add(title)
}

fn label_text(label: &LabelPrimitive) -> Text {
    Text::new(label.text.clone())
        .set("dy", "0.35em")
        .set("fill-opacity", label.opacity)
        .set("transform", label.placement.to_svg_transform())
}

pub fn write_svg<W: Write>(writer: W, scene: &SunburstScene) -> Result<()> {
    svg::write(writer, &scene_to_svg_document(scene)).context("Failed to write SVG")
}

pub fn save_svg(path: &Path, scene: &SunburstScene) -> Result<()> {
    svg::save(path, &scene_to_svg_document(scene))
        .with_context(|| format!("Failed to save SVG to {}", path.display()))?;
    tracing::info!("Wrote {} arcs to {}", scene.arcs.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::Record;
    use crate::layout::partition;
    use crate::render::colors::BranchPalette;
    use crate::render::scene::build_scene;
    use crate::tree::build_tree;
    use crate::ui::navigation::ZoomController;

    fn render(records: &[Record]) -> String {
        let tree = build_tree(records, "R").unwrap();
        let config = ChartConfig::default();
        let zoom = ZoomController::new(&tree, partition(&tree), &config);
        let palette = BranchPalette::for_tree(&tree);
        let scene = build_scene(&tree, &zoom, &palette, &config, None);
        scene_to_svg_document(&scene).to_string()
    }

    #[test]
    fn document_has_arcs_labels_and_center() {
        let svg = render(&[
            Record::new("A", None, "R"),
            Record::new("B", Some("A"), "R"),
            Record::new("C", Some("A"), "R"),
            Record::new("D", Some("B"), "R"),
        ]);
        assert!(svg.contains("viewBox=\"-500 -500 1000 1000\""));
        assert_eq!(svg.matches("<path").count(), 3);
        assert_eq!(svg.matches("<title>").count(), 3);
        assert!(svg.contains("Company: D"));
        assert!(svg.contains("pointer-events=\"all\""));
        assert!(svg.contains("cursor: pointer;"));
        assert!(svg.contains("#6e40aa"));
    }

    #[test]
    fn root_only_tree_draws_just_the_center() {
        let svg = render(&[Record::new("Solo", None, "R")]);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains(">Solo<") || svg.contains(">\nSolo\n<"));
        assert!(svg.contains("<circle"));
    }
}
