use std::f64::consts::TAU;

use super::PolarSpan;
use crate::tree::arena::{CompanyTree, NodeId};

/// Compute the sunburst partition for the whole tree.
///
/// The root spans the full circle; each node's angular span is divided
/// among its (sorted) children in proportion to `child.value / parent.value`.
/// Radial bands are one ring unit wide per depth level. The result is
/// indexed by `NodeId`.
pub fn partition(tree: &CompanyTree) -> Vec<PolarSpan> {
    let mut spans = vec![PolarSpan::default(); tree.len()];
    spans[tree.root.index()] = band(tree, tree.root, 0.0, TAU);

    // Arena order visits every parent before its children.
    for id in tree.ids() {
        let parent = tree.get(id);
        if parent.children.is_empty() {
            continue;
        }
        let span = spans[id.index()];
        let width = span.angular_width();
        let parent_value = parent.value as f64;

        let mut cumulative = 0u64;
        for &child in &parent.children {
            let x0 = span.x0 + offset(width, cumulative, parent_value);
            cumulative += tree.get(child).value;
            let x1 = span.x0 + offset(width, cumulative, parent_value);
            spans[child.index()] = band(tree, child, x0, x1);
        }
    }

    tracing::debug!(
        "Partitioned {} nodes into {} rings",
        tree.len(),
        tree.get(tree.root).height + 1
    );
    spans
}

fn band(tree: &CompanyTree, id: NodeId, x0: f64, x1: f64) -> PolarSpan {
    let depth = tree.get(id).depth as f64;
    PolarSpan {
        x0,
        x1,
        y0: depth,
        y1: depth + 1.0,
    }
}

fn offset(width: f64, cumulative: u64, parent_value: f64) -> f64 {
    if parent_value <= 0.0 {
        return 0.0;
    }
    width * (cumulative as f64 / parent_value)
}
