use super::arc::{ArcGeometry, LabelPlacement};
use super::colors::{AppColor, BranchPalette};
use crate::config::ChartConfig;
use crate::tree::arena::{CompanyTree, NodeId};
use crate::ui::navigation::ZoomController;
use crate::ui::tooltip::build_tooltip;

/// One arc ready to draw, in chart-centered pixel coordinates.
#[derive(Debug, Clone)]
pub struct ArcPrimitive {
    pub node: NodeId,
    pub geometry: ArcGeometry,
    pub fill: AppColor,
    /// 0 for arcs outside the visible rings; they are kept so animations can
    /// bring them back in.
    pub opacity: f32,
    pub interactive: bool,
    /// Only companies with children can be zoomed into
    pub clickable: bool,
    pub hovered: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone)]
pub struct LabelPrimitive {
    pub node: NodeId,
    pub text: String,
    pub placement: LabelPlacement,
    pub font_size: f32,
    pub opacity: f32,
}

/// Transparent disc over the first ring that zooms back out when clicked.
#[derive(Debug, Clone)]
pub struct CenterPrimitive {
    pub radius: f64,
    /// Company name of the current focus
    pub label: String,
    pub font_size: f32,
    /// Node a click on the disc zooms to
    pub zoom_out_target: NodeId,
}

/// Backend-neutral drawing commands for one frame. Painted in order:
/// arcs, labels, then the center disc and its label.
#[derive(Debug, Clone)]
pub struct SunburstScene {
    /// Side of the square drawing area (px)
    pub width: f64,
    pub focus: NodeId,
    pub arcs: Vec<ArcPrimitive>,
    pub labels: Vec<LabelPrimitive>,
    pub center: CenterPrimitive,
}

impl SunburstScene {
    pub fn arc(&self, node: NodeId) -> Option<&ArcPrimitive> {
        self.arcs.iter().find(|a| a.node == node)
    }

    /// Arcs with a non-zero opacity.
    pub fn visible_arcs(&self) -> impl Iterator<Item = &ArcPrimitive> {
        self.arcs.iter().filter(|a| a.opacity > 0.0)
    }

    pub fn visible_labels(&self) -> impl Iterator<Item = &LabelPrimitive> {
        self.labels.iter().filter(|l| l.opacity > 0.0)
    }
}

/// Build the drawing commands for the zoom state's current frame. Every
/// node except the root yields one arc and one label.
pub fn build_scene(
    tree: &CompanyTree,
    zoom: &ZoomController,
    palette: &BranchPalette,
    config: &ChartConfig,
    hover: Option<NodeId>,
) -> SunburstScene {
    let spans = zoom.current();
    let mut arcs = Vec::with_capacity(tree.len().saturating_sub(1));
    let mut labels = Vec::with_capacity(tree.len().saturating_sub(1));

    for id in tree.ids().filter(|&id| id != tree.root) {
        let node = tree.get(id);
        let span = &spans[id.index()];
        let shown = zoom.presentation(id);

        arcs.push(ArcPrimitive {
            node: id,
            geometry: ArcGeometry::from_span(span, config),
            fill: palette.node_color(tree, id),
            opacity: shown.arc_opacity,
            interactive: shown.interactive,
            clickable: !node.is_leaf(),
            hovered: hover == Some(id) && shown.interactive,
            tooltip: build_tooltip(tree, id).to_text(),
        });

        labels.push(LabelPrimitive {
            node: id,
            text: node.company.to_string(),
            placement: LabelPlacement::for_span(span, config.radius),
            font_size: config.label_font_size,
            opacity: if shown.label_shown { 1.0 } else { 0.0 },
        });
    }

    let focus = zoom.focus();
    SunburstScene {
        width: config.width,
        focus,
        arcs,
        labels,
        center: CenterPrimitive {
            radius: config.radius,
            label: tree.get(focus).company.to_string(),
            font_size: config.center_font_size,
            zoom_out_target: zoom.zoom_out_target(tree),
        },
    }
}
