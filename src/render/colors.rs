use std::collections::HashMap;

use compact_str::CompactString;

use crate::tree::arena::{CompanyTree, NodeId};

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channels quantized to 0..=255.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Convert to vello's peniko Color.
    #[cfg(feature = "gui")]
    pub fn to_peniko(self) -> vello::peniko::Color {
        vello::peniko::Color::new([self.r, self.g, self.b, self.a])
    }

    /// Create a lighter version (hover highlight).
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }
}

/// Cyclical rainbow through cubehelix space; `t` wraps into `[0, 1]`, and
/// 0 and 1 give the same color.
pub fn rainbow(t: f64) -> AppColor {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let ts = (t - 0.5).abs();
    cubehelix(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts)
}

/// Cubehelix (Green 2011) hue in degrees, saturation and lightness to RGB,
/// quantized to 8 bits per channel like a CSS color string.
fn cubehelix(h: f64, s: f64, l: f64) -> AppColor {
    const A: f64 = -0.14861;
    const B: f64 = 1.78277;
    const C: f64 = -0.29227;
    const D: f64 = -0.90649;
    const E: f64 = 1.97294;

    let h = (h + 120.0).to_radians();
    let amp = s * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();
    let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    AppColor::from_rgb8(
        channel(l + amp * (A * cos_h + B * sin_h)),
        channel(l + amp * (C * cos_h + D * sin_h)),
        channel(l + amp * (E * cos_h)),
    )
}

/// `n` colors evenly sampled from the rainbow, endpoints included.
pub fn quantize_rainbow(n: usize) -> Vec<AppColor> {
    match n {
        0 => Vec::new(),
        1 => vec![rainbow(0.0)],
        _ => (0..n)
            .map(|i| rainbow(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Categorical colors for the top-level branches of one tree. Every arc
/// takes the color of its depth-1 ancestor.
#[derive(Debug, Clone)]
pub struct BranchPalette {
    colors: Vec<AppColor>,
    assigned: HashMap<CompactString, usize>,
}

impl BranchPalette {
    /// One slot per top-level branch plus one, since the rainbow's two ends
    /// coincide. Branches claim slots in sorted child order.
    pub fn for_tree(tree: &CompanyTree) -> Self {
        let branches = tree.children(tree.root);
        let colors = quantize_rainbow(branches.len() + 1);
        let assigned = branches
            .iter()
            .enumerate()
            .map(|(i, &id)| (tree.get(id).company.clone(), i))
            .collect();
        Self { colors, assigned }
    }

    pub fn branch_color(&self, company: &str) -> Option<AppColor> {
        self.assigned.get(company).map(|&i| self.colors[i])
    }

    /// Fill color for any non-root node. The root itself is never drawn and
    /// gets the first palette entry.
    pub fn node_color(&self, tree: &CompanyTree, id: NodeId) -> AppColor {
        tree.top_level_ancestor(id)
            .and_then(|branch| self.branch_color(&tree.get(branch).company))
            .unwrap_or_else(|| rainbow(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use crate::tree::build_tree;

    #[test]
    fn rainbow_matches_reference_values() {
        assert_eq!(rainbow(0.0).to_rgb8(), [110, 64, 170]);
        assert_eq!(rainbow(1.0).to_rgb8(), [110, 64, 170]);
        assert_eq!(rainbow(0.5).to_rgb8(), [175, 240, 91]);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(AppColor::from_rgb8(255, 0, 16).to_hex(), "#ff0010");
    }

    #[test]
    fn palette_has_one_spare_slot() {
        assert_eq!(quantize_rainbow(4).len(), 4);
        assert_eq!(quantize_rainbow(1), vec![rainbow(0.0)]);
    }

    #[test]
    fn descendants_share_their_branch_color() {
        let records = vec![
            Record::new("A", None, "R"),
            Record::new("B", Some("A"), "R"),
            Record::new("C", Some("A"), "R"),
            Record::new("D", Some("B"), "R"),
        ];
        let tree = build_tree(&records, "R").unwrap();
        let palette = BranchPalette::for_tree(&tree);
        assert_eq!(palette.colors.len(), 3);
        let b = tree.find("B").unwrap();
        let c = tree.find("C").unwrap();
        let d = tree.find("D").unwrap();
        assert_eq!(palette.node_color(&tree, d), palette.node_color(&tree, b));
        assert_ne!(palette.node_color(&tree, c), palette.node_color(&tree, b));
        assert_eq!(palette.node_color(&tree, b), rainbow(0.0));
        assert_eq!(palette.node_color(&tree, c), rainbow(0.5));
    }
}
