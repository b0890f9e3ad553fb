use std::time::{Duration, Instant};

use crate::config::ChartConfig;
use crate::layout::{zoom_targets, PolarSpan, Tween, VisibilityConfig};
use crate::tree::arena::{CompanyTree, NodeId};

/// How one node is currently shown. Opacity and interactivity snap rather
/// than interpolate; only the geometry animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePresentation {
    pub arc_opacity: f32,
    /// Receives hover and clicks
    pub interactive: bool,
    pub label_shown: bool,
}

impl NodePresentation {
    pub const HIDDEN: NodePresentation = NodePresentation {
        arc_opacity: 0.0,
        interactive: false,
        label_shown: false,
    };

    pub fn is_shown(&self) -> bool {
        self.arc_opacity > 0.0
    }
}

/// One timed animation in flight.
#[derive(Debug, Clone)]
pub struct ActiveTransition {
    tween: Tween,
    started: Instant,
    duration: Duration,
    /// Presentation to apply once the animation ends
    settled: Vec<NodePresentation>,
}

impl ActiveTransition {
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn fraction(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub enum ZoomPhase {
    Idle,
    Transitioning(ActiveTransition),
}

/// Zoom state for one tree: the focus node plus the current (possibly
/// mid-animation) and target spans of every node.
#[derive(Debug, Clone)]
pub struct ZoomController {
    base: Vec<PolarSpan>,
    current: Vec<PolarSpan>,
    target: Vec<PolarSpan>,
    presentation: Vec<NodePresentation>,
    focus: NodeId,
    root: NodeId,
    phase: ZoomPhase,
    visibility: VisibilityConfig,
    branch_opacity: f32,
    leaf_opacity: f32,
}

impl ZoomController {
    /// Start at the root with every node at its base layout span.
    pub fn new(tree: &CompanyTree, base: Vec<PolarSpan>, config: &ChartConfig) -> Self {
        let mut zoom = Self {
            current: base.clone(),
            target: base.clone(),
            base,
            presentation: Vec::new(),
            focus: tree.root,
            root: tree.root,
            phase: ZoomPhase::Idle,
            visibility: config.visibility.clone(),
            branch_opacity: config.branch_opacity,
            leaf_opacity: config.leaf_opacity,
        };
        zoom.presentation = zoom.settled_presentation(tree, &zoom.current);
        zoom
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn base(&self) -> &[PolarSpan] {
        &self.base
    }

    pub fn current(&self) -> &[PolarSpan] {
        &self.current
    }

    pub fn target(&self) -> &[PolarSpan] {
        &self.target
    }

    pub fn presentation(&self, id: NodeId) -> NodePresentation {
        self.presentation[id.index()]
    }

    pub fn phase(&self) -> &ZoomPhase {
        &self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, ZoomPhase::Transitioning(_))
    }

    /// Node the center circle zooms out to: the focus's parent, or the root.
    pub fn zoom_out_target(&self, tree: &CompanyTree) -> NodeId {
        tree.get(self.focus).parent.unwrap_or(self.root)
    }

    /// Zoom to `node`. Interrupts any transition in flight; animation resumes
    /// from the interpolated spans reached so far.
    pub fn clicked(&mut self, tree: &CompanyTree, node: NodeId, duration: Duration, now: Instant) {
        self.focus = node;
        self.target = zoom_targets(tree, &self.base, node);

        let settled = self.settled_presentation(tree, &self.target);
        for (shown, end) in self.presentation.iter_mut().zip(&settled) {
            // Entering arcs appear right away; leaving ones stay until the end.
            if end.is_shown() || !shown.is_shown() {
                shown.arc_opacity = end.arc_opacity;
            }
            shown.interactive = end.interactive;
            if end.label_shown {
                shown.label_shown = true;
            }
        }

        tracing::debug!(
            "Zoom to '{}' (depth {}) over {:?}",
            tree.get(node).company,
            tree.get(node).depth,
            duration
        );

        self.phase = ZoomPhase::Transitioning(ActiveTransition {
            tween: Tween::new(self.current.clone(), self.target.clone()),
            started: now,
            duration,
            settled,
        });
    }

    /// Click on the center circle.
    pub fn zoom_out(&mut self, tree: &CompanyTree, duration: Duration, now: Instant) {
        let parent = self.zoom_out_target(tree);
        self.clicked(tree, parent, duration, now);
    }

    /// Advance the animation to `now`. Returns true while still animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ZoomPhase::Transitioning(transition) = &self.phase else {
            return false;
        };
        let fraction = transition.fraction(now);
        transition.tween.apply(fraction, &mut self.current);
        if fraction < 1.0 {
            return true;
        }

        self.presentation = transition.settled.clone();
        self.phase = ZoomPhase::Idle;
        false
    }

    /// Jump straight to the end of any transition in flight.
    pub fn finish(&mut self) {
        if let ZoomPhase::Transitioning(transition) = &self.phase {
            self.current.copy_from_slice(&self.target);
            self.presentation = transition.settled.clone();
            self.phase = ZoomPhase::Idle;
        }
    }

    /// Presentation of every node once it sits at `spans`.
    fn settled_presentation(
        &self,
        tree: &CompanyTree,
        spans: &[PolarSpan],
    ) -> Vec<NodePresentation> {
        tree.ids()
            .map(|id| {
                let span = &spans[id.index()];
                if id == tree.root || !self.visibility.arc_visible(span) {
                    return NodePresentation {
                        label_shown: id != tree.root && self.visibility.label_visible(span),
                        ..NodePresentation::HIDDEN
                    };
                }
                let opacity = if tree.get(id).is_leaf() {
                    self.leaf_opacity
                } else {
                    self.branch_opacity
                };
                NodePresentation {
                    arc_opacity: opacity,
                    interactive: true,
                    label_shown: self.visibility.label_visible(span),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use crate::data::Record;
    use crate::layout::partition;
    use crate::tree::build_tree;

    const FAST: Duration = Duration::from_millis(750);

    fn setup() -> (CompanyTree, ZoomController) {
        let records = vec![
            Record::new("A", None, "R"),
            Record::new("B", Some("A"), "R"),
            Record::new("C", Some("A"), "R"),
            Record::new("D", Some("B"), "R"),
            Record::new("E", Some("D"), "R"),
            Record::new("F", Some("E"), "R"),
        ];
        let tree = build_tree(&records, "R").unwrap();
        let base = partition(&tree);
        let zoom = ZoomController::new(&tree, base, &ChartConfig::default());
        (tree, zoom)
    }

    #[test]
    fn starts_idle_at_root_with_base_spans() {
        let (tree, zoom) = setup();
        assert_eq!(zoom.focus(), tree.root);
        assert!(!zoom.is_transitioning());
        assert_eq!(zoom.current(), zoom.base());
        assert!(!zoom.presentation(tree.root).is_shown());
        let b = tree.find("B").unwrap();
        assert_eq!(zoom.presentation(b).arc_opacity, 0.6);
        let c = tree.find("C").unwrap();
        assert_eq!(zoom.presentation(c).arc_opacity, 0.4);
        // E sits in ring 3, outside the window
        let e = tree.find("E").unwrap();
        assert!(!zoom.presentation(e).is_shown());
    }

    #[test]
    fn transition_runs_to_completion() {
        let (tree, mut zoom) = setup();
        let t0 = Instant::now();
        let b = tree.find("B").unwrap();
        zoom.clicked(&tree, b, FAST, t0);
        assert!(zoom.is_transitioning());

        assert!(zoom.tick(t0 + Duration::from_millis(300)));
        let mid = zoom.current()[b.index()];
        assert!(mid.x1 > zoom.base()[b.index()].x1 && mid.x1 < TAU);

        assert!(!zoom.tick(t0 + FAST));
        assert!(!zoom.is_transitioning());
        assert_eq!(zoom.current(), zoom.target());
        assert_eq!(zoom.current()[b.index()], PolarSpan::new(0.0, TAU, 0.0, 1.0));
    }

    #[test]
    fn entering_arcs_snap_in_and_leaving_arcs_wait() {
        let (tree, mut zoom) = setup();
        let t0 = Instant::now();
        let c = tree.find("C").unwrap();
        let e = tree.find("E").unwrap();
        let f = tree.find("F").unwrap();
        zoom.clicked(&tree, tree.find("B").unwrap(), FAST, t0);

        // E moves into the outer ring and is shown from the first frame
        assert!(zoom.presentation(e).is_shown());
        assert!(zoom.presentation(e).interactive);
        assert!(!zoom.presentation(f).is_shown());
        // C collapses but keeps its opacity until the animation ends
        assert!(zoom.presentation(c).is_shown());
        assert!(!zoom.presentation(c).interactive);

        zoom.tick(t0 + FAST);
        assert!(!zoom.presentation(c).is_shown());
    }

    #[test]
    fn zoom_in_then_out_restores_spans() {
        let (tree, mut zoom) = setup();
        let t0 = Instant::now();
        let b = tree.find("B").unwrap();
        zoom.clicked(&tree, b, FAST, t0);
        zoom.tick(t0 + FAST);
        assert_eq!(zoom.zoom_out_target(&tree), tree.root);
        zoom.zoom_out(&tree, FAST, t0 + FAST);
        zoom.tick(t0 + FAST * 2);

        assert_eq!(zoom.focus(), tree.root);
        for (cur, base) in zoom.current().iter().zip(zoom.base()) {
            assert!(cur.approx_eq(base, 1e-9));
        }
    }

    #[test]
    fn interrupted_transition_resumes_from_interpolated_spans() {
        let (tree, mut zoom) = setup();
        let t0 = Instant::now();
        let b = tree.find("B").unwrap();
        zoom.clicked(&tree, b, FAST, t0);
        zoom.tick(t0 + Duration::from_millis(375));
        let halfway = zoom.current().to_vec();

        let t1 = t0 + Duration::from_millis(375);
        zoom.zoom_out(&tree, FAST, t1);
        zoom.tick(t1);
        assert_eq!(zoom.current(), halfway.as_slice());

        zoom.tick(t1 + FAST);
        for (cur, base) in zoom.current().iter().zip(zoom.base()) {
            assert!(cur.approx_eq(base, 1e-9));
        }
    }

    #[test]
    fn zoom_out_at_root_stays_at_root() {
        let (tree, mut zoom) = setup();
        let t0 = Instant::now();
        zoom.zoom_out(&tree, FAST, t0);
        zoom.finish();
        assert_eq!(zoom.focus(), tree.root);
        for (cur, base) in zoom.current().iter().zip(zoom.base()) {
            assert!(cur.approx_eq(base, 1e-9));
        }
    }
}
