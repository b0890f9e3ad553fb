use std::f64::consts::TAU;

use super::PolarSpan;
use crate::tree::arena::{CompanyTree, NodeId};

/// Re-normalize a base span against a new focus.
///
/// The focus's angular span is stretched to the full circle; anything
/// outside it clamps to a zero-width span at 0 or 2π. Radial bands shift
/// inward by the focus depth and floor at 0, so the focus and its
/// ancestors end up in (or inside) the center.
pub fn zoom_target(span: &PolarSpan, focus: &PolarSpan, focus_depth: u32) -> PolarSpan {
    let width = focus.angular_width();
    let rescale = |x: f64| {
        if width <= 0.0 {
            // Degenerate focus: everything at or past it collapses to the end.
            return if x > focus.x0 { TAU } else { 0.0 };
        }
        ((x - focus.x0) / width).clamp(0.0, 1.0) * TAU
    };
    let depth = focus_depth as f64;
    PolarSpan {
        x0: rescale(span.x0),
        x1: rescale(span.x1),
        y0: (span.y0 - depth).max(0.0),
        y1: (span.y1 - depth).max(0.0),
    }
}

/// Targets for every node when `focus` becomes the zoom center.
pub fn zoom_targets(tree: &CompanyTree, base: &[PolarSpan], focus: NodeId) -> Vec<PolarSpan> {
    let focus_span = base[focus.index()];
    let focus_depth = tree.get(focus).depth;
    base.iter()
        .map(|span| zoom_target(span, &focus_span, focus_depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use crate::layout::{arc_visible, partition};
    use crate::tree::build_tree;

    fn example() -> CompanyTree {
        let records = vec![
            Record::new("A", None, "R"),
            Record::new("B", Some("A"), "R"),
            Record::new("C", Some("A"), "R"),
            Record::new("D", Some("B"), "R"),
        ];
        build_tree(&records, "R").unwrap()
    }

    #[test]
    fn focusing_root_is_identity() {
        let tree = example();
        let base = partition(&tree);
        let targets = zoom_targets(&tree, &base, tree.root);
        for (b, t) in base.iter().zip(&targets) {
            assert!(b.approx_eq(t, 1e-12));
        }
    }

    #[test]
    fn focusing_b_gives_b_the_full_circle() {
        let tree = example();
        let base = partition(&tree);
        let b = tree.find("B").unwrap();
        let targets = zoom_targets(&tree, &base, b);

        let tb = targets[b.index()];
        assert_eq!((tb.x0, tb.x1), (0.0, TAU));
        assert_eq!((tb.y0, tb.y1), (0.0, 1.0));

        let td = targets[tree.find("D").unwrap().index()];
        assert_eq!(td, PolarSpan::new(0.0, TAU, 1.0, 2.0));
        assert!(arc_visible(&td));

        let tc = targets[tree.find("C").unwrap().index()];
        assert_eq!(tc.x0, tc.x1);
        assert!(!arc_visible(&tc));

        let ta = targets[tree.root.index()];
        assert_eq!((ta.y0, ta.y1), (0.0, 0.0));
        assert!(!arc_visible(&ta));
    }

    #[test]
    fn spans_before_focus_collapse_to_zero() {
        let focus = PolarSpan::new(1.0, 2.0, 1.0, 2.0);
        let before = PolarSpan::new(0.2, 0.8, 1.0, 2.0);
        let t = zoom_target(&before, &focus, 1);
        assert_eq!((t.x0, t.x1), (0.0, 0.0));
        let after = PolarSpan::new(2.5, 3.0, 1.0, 2.0);
        let t = zoom_target(&after, &focus, 1);
        assert_eq!((t.x0, t.x1), (TAU, TAU));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::data::Record;
    use crate::layout::partition;
    use crate::tree::build_tree;
    use proptest::prelude::*;

    fn arb_tree() -> impl Strategy<Value = CompanyTree> {
        prop::collection::vec(any::<prop::sample::Index>(), 1..50).prop_map(|parents| {
            let mut records = vec![Record::new("n0", None, "R")];
            for (i, parent) in parents.iter().enumerate() {
                let parent = format!("n{}", parent.index(i + 1));
                records.push(Record::new(&format!("n{}", i + 1), Some(&parent), "R"));
            }
            build_tree(&records, "R").unwrap()
        })
    }

    proptest! {
        #[test]
        fn focus_fills_the_center(tree in arb_tree(), pick in any::<prop::sample::Index>()) {
            let base = partition(&tree);
            let focus = NodeId(pick.index(tree.len()) as u32);
            let targets = zoom_targets(&tree, &base, focus);

            let t = targets[focus.index()];
            prop_assert!(t.approx_eq(&PolarSpan::FULL_RING, 1e-9));

            let inside = tree.descendants(focus);
            for id in tree.ids() {
                let t = targets[id.index()];
                prop_assert!(t.x0 >= 0.0 && t.x1 <= TAU && t.x0 <= t.x1);
                prop_assert!(t.y0 >= 0.0);
                if !inside.contains(&id) && tree.get(id).depth > tree.get(focus).depth {
                    prop_assert!(t.angular_width() < 1e-9);
                }
            }
        }
    }
}
