use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use crate::config::ChartConfig;
use crate::data::{self, Record};
use crate::layout::partition;
use crate::render::colors::BranchPalette;
use crate::render::scene::{build_scene, SunburstScene};
use crate::tree::arena::{CompanyTree, NodeId};
use crate::tree::build_tree_with;
use crate::ui::input::{self, Hit};
use crate::ui::navigation::ZoomController;
use crate::ui::selector::{RootChanged, RootSelector};
use crate::ui::tooltip::{build_tooltip, TooltipInfo};

/// Application phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPhase {
    /// No data loaded yet
    WaitingForData,
    /// A chart is on screen
    Ready,
    /// The selected group could not be turned into a hierarchy
    Blank,
}

/// Everything derived from one root group.
#[derive(Debug, Clone)]
pub struct Chart {
    pub root: String,
    pub tree: CompanyTree,
    pub palette: BranchPalette,
    pub zoom: ZoomController,
}

/// The chart's render context: loaded rows, the selected group's tree and
/// zoom state, and the scene for the current frame. Nothing here touches a
/// window, so the same state drives the viewer and the headless tools.
pub struct App {
    pub phase: AppPhase,
    pub config: ChartConfig,
    pub source: Option<PathBuf>,
    pub records: Vec<Record>,
    pub selector: RootSelector,
    pub chart: Option<Chart>,
    pub hover_node: Option<NodeId>,
    /// Last load or hierarchy error, shown instead of the chart
    pub last_error: Option<String>,
    scene: Option<SunburstScene>,
    needs_rebuild: bool,
}

impl App {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            phase: AppPhase::WaitingForData,
            config,
            source: None,
            records: Vec::new(),
            selector: RootSelector::default(),
            chart: None,
            hover_node: None,
            last_error: None,
            scene: None,
            needs_rebuild: true,
        }
    }

    /// Read a CSV file and show its first root group (or `initial_root`).
    /// A failed load keeps whatever was shown before.
    pub fn load_file(&mut self, path: &Path, initial_root: Option<&str>) -> Result<()> {
        let records = data::load_records(path)?;
        self.source = Some(path.to_path_buf());
        self.set_records(records, initial_root);
        Ok(())
    }

    /// Replace the loaded rows and repopulate the root selector.
    pub fn set_records(&mut self, records: Vec<Record>, initial_root: Option<&str>) {
        let (selector, first) = RootSelector::populate(&records);
        self.records = records;
        self.selector = selector;
        self.chart = None;
        self.last_error = None;
        self.phase = AppPhase::WaitingForData;

        let initial = match initial_root {
            Some(root) => self.selector.select(root).or(first),
            None => first,
        };
        match initial {
            Some(changed) => self.show_root(changed),
            None => {
                tracing::warn!("No rows loaded, nothing to draw");
                self.mark_dirty();
            }
        }
    }

    pub fn select_root(&mut self, root: &str) {
        if let Some(changed) = self.selector.select(root) {
            self.show_root(changed);
        }
    }

    pub fn select_root_index(&mut self, index: usize) {
        if let Some(changed) = self.selector.select_index(index) {
            self.show_root(changed);
        }
    }

    pub fn next_root(&mut self) {
        if let Some(changed) = self.selector.select_next() {
            self.show_root(changed);
        }
    }

    pub fn previous_root(&mut self) {
        if let Some(changed) = self.selector.select_previous() {
            self.show_root(changed);
        }
    }

    /// Tear down the current chart and build one for `changed.root`. A
    /// malformed group leaves the chart blank.
    fn show_root(&mut self, changed: RootChanged) {
        let started = Instant::now();
        self.hover_node = None;
        match build_tree_with(&self.records, &changed.root, self.config.value_mode) {
            Ok(tree) => {
                let base = partition(&tree);
                let zoom = ZoomController::new(&tree, base, &self.config);
                let palette = BranchPalette::for_tree(&tree);
                tracing::info!(
                    "Showing '{}': {} companies, {} branches ({:?})",
                    changed.root,
                    tree.len(),
                    tree.children(tree.root).len(),
                    started.elapsed()
                );
                self.chart = Some(Chart {
                    root: changed.root.to_string(),
                    tree,
                    palette,
                    zoom,
                });
                self.last_error = None;
                self.phase = AppPhase::Ready;
            }
            Err(e) => {
                tracing::error!("Cannot draw '{}': {}", changed.root, e);
                self.chart = None;
                self.last_error = Some(e.to_string());
                self.phase = AppPhase::Blank;
            }
        }
        self.mark_dirty();
    }

    /// Handle a click at a point relative to the chart center. Returns true
    /// if a zoom transition started.
    pub fn click(&mut self, x: f64, y: f64, slow: bool, now: Instant) -> bool {
        self.refresh_scene();
        let Some(target) = self.scene.as_ref().and_then(|s| input::click_target(s, x, y)) else {
            return false;
        };
        self.zoom_to_node(target, slow, now);
        true
    }

    /// Same as clicking the center disc.
    pub fn zoom_out(&mut self, slow: bool, now: Instant) {
        let duration = self.config.transition_duration(slow);
        if let Some(chart) = &mut self.chart {
            chart.zoom.zoom_out(&chart.tree, duration, now);
            self.mark_dirty();
        }
    }

    fn zoom_to_node(&mut self, node: NodeId, slow: bool, now: Instant) {
        let duration = self.config.transition_duration(slow);
        if let Some(chart) = &mut self.chart {
            chart.zoom.clicked(&chart.tree, node, duration, now);
            self.mark_dirty();
        }
    }

    /// Jump straight to `company` without animating.
    pub fn focus_on(&mut self, company: &str) -> Result<()> {
        let chart = self
            .chart
            .as_mut()
            .ok_or_else(|| anyhow!("No chart to zoom"))?;
        let node = chart
            .tree
            .find(company)
            .ok_or_else(|| anyhow!("Company '{}' is not in group '{}'", company, chart.root))?;
        chart.zoom.clicked(&chart.tree, node, Duration::ZERO, Instant::now());
        chart.zoom.finish();
        self.mark_dirty();
        Ok(())
    }

    /// Update the hovered arc from a point relative to the chart center.
    /// Returns true if the hover changed.
    pub fn hover(&mut self, x: f64, y: f64) -> bool {
        self.refresh_scene();
        let hovered = match self.scene.as_ref().and_then(|s| input::hit_test(s, x, y)) {
            Some(Hit::Arc(node)) => Some(node),
            _ => None,
        };
        if hovered == self.hover_node {
            return false;
        }
        self.hover_node = hovered;
        self.mark_dirty();
        true
    }

    pub fn tooltip(&self) -> Option<TooltipInfo> {
        let chart = self.chart.as_ref()?;
        self.hover_node.map(|id| build_tooltip(&chart.tree, id))
    }

    /// Advance any running animation. Returns true while animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(chart) = &mut self.chart else {
            return false;
        };
        if !chart.zoom.is_transitioning() {
            return false;
        }
        let animating = chart.zoom.tick(now);
        self.mark_dirty();
        animating
    }

    pub fn is_animating(&self) -> bool {
        self.chart
            .as_ref()
            .is_some_and(|c| c.zoom.is_transitioning())
    }

    pub fn focus(&self) -> Option<&str> {
        let chart = self.chart.as_ref()?;
        Some(chart.tree.get(chart.zoom.focus()).company.as_str())
    }

    pub fn mark_dirty(&mut self) {
        self.needs_rebuild = true;
    }

    /// Recompute the drawing commands for the current frame.
    pub fn rebuild_scene(&mut self) {
        self.scene = self.chart.as_ref().map(|chart| {
            build_scene(
                &chart.tree,
                &chart.zoom,
                &chart.palette,
                &self.config,
                self.hover_node,
            )
        });
        self.needs_rebuild = false;
    }

    fn refresh_scene(&mut self) {
        if self.needs_rebuild {
            self.rebuild_scene();
        }
    }

    /// Scene for the current frame, rebuilt if anything changed. None while
    /// the chart is blank.
    pub fn scene(&mut self) -> Option<&SunburstScene> {
        self.refresh_scene();
        self.scene.as_ref()
    }
}
