use crate::tree::arena::{CompanyTree, NodeId};

/// Information to display in the tooltip when hovering over an arc.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub company: String,
    /// Parent company, `None` at the root
    pub parent: Option<String>,
    pub children: usize,
    pub descendants: usize,
}

impl TooltipInfo {
    /// The four tooltip lines, in display order.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Company: {}", self.company),
            format!("Parent: {}", self.parent.as_deref().unwrap_or("None")),
            format!("Children: {}", self.children),
            format!("Descendants: {}", self.descendants),
        ]
    }

    /// Newline-joined lines, as used for SVG `<title>` elements.
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

/// Build tooltip info for a node.
pub fn build_tooltip(tree: &CompanyTree, node_id: NodeId) -> TooltipInfo {
    let node = tree.get(node_id);
    TooltipInfo {
        company: node.company.to_string(),
        parent: node.parent.map(|p| tree.get(p).company.to_string()),
        children: node.children.len(),
        descendants: tree.descendant_count(node_id),
    }
}

/// Ancestry from the root down to `node_id`, joined with " / ".
pub fn build_path(tree: &CompanyTree, node_id: NodeId) -> String {
    let mut parts = Vec::new();
    let mut current = Some(node_id);

    while let Some(id) = current {
        let node = tree.get(id);
        parts.push(node.company.as_str());
        current = node.parent;
    }

    parts.reverse();
    parts.join(" / ")
}
