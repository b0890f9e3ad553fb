use compact_str::CompactString;

/// Index into the arena `Vec<CompanyNode>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single company in the hierarchy, stored in a flat arena.
#[derive(Debug, Clone)]
pub struct CompanyNode {
    /// Company identity
    pub company: CompactString,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// Children, sorted by `value` descending once the tree is built
    pub children: Vec<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u32,
    /// Longest distance down to a leaf (leaves = 0)
    pub height: u32,
    /// Subtree weight used for angular partitioning
    pub value: u64,
}

impl CompanyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The company hierarchy for one root group, stored as a flat arena.
/// Parents always have smaller indices than their children.
#[derive(Debug, Clone)]
pub struct CompanyTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<CompanyNode>,
    /// Root node index
    pub root: NodeId,
}

impl CompanyTree {
    /// Create a tree holding only its root company.
    pub fn new(root_company: &str) -> Self {
        let root_node = CompanyNode {
            company: CompactString::new(root_company),
            parent: None,
            children: Vec::new(),
            depth: 0,
            height: 0,
            value: 0,
        };

        CompanyTree {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Append a child company under `parent`. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, company: &str) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        let depth = self.nodes[parent.index()].depth + 1;
        self.nodes.push(CompanyNode {
            company: CompactString::new(company),
            parent: Some(parent),
            children: Vec::new(),
            depth,
            height: 0,
            value: 0,
        });
        self.nodes[parent.index()].children.push(new_id);
        new_id
    }

    pub fn get(&self, id: NodeId) -> &CompanyNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut CompanyNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// All node IDs in arena order (every parent before its children).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Pre-order walk of the subtree rooted at `id`, following sorted child order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Number of nodes below `id` (excluding itself).
    pub fn descendant_count(&self, id: NodeId) -> usize {
        self.descendants(id).len() - 1
    }

    /// Walk up to the ancestor sitting at depth 1 (the top-level branch).
    /// Returns None for the root itself.
    pub fn top_level_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = self.get(current);
            match node.depth {
                0 => return None,
                1 => return Some(current),
                _ => current = node.parent?,
            }
        }
    }

    /// Find a node by company identity.
    pub fn find(&self, company: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.company == company)
            .map(|i| NodeId(i as u32))
    }
}
