use super::arena::CompanyTree;

/// How subtree weights are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMode {
    /// Leaves weigh 1, internal nodes the sum of their children.
    /// Children spans exactly fill their parent's span.
    #[default]
    Leaves,
    /// Every company weighs 1 on top of its children, so a parent keeps a
    /// sliver of its own span past the last child.
    Nodes,
}

/// Compute `value` for all nodes (bottom-up).
pub fn aggregate_values(tree: &mut CompanyTree, mode: ValueMode) {
    // Children always have higher indices than their parents in the arena.
    for i in (0..tree.nodes.len()).rev() {
        let node = &tree.nodes[i];
        let is_leaf = node.children.is_empty();
        let children_sum: u64 = node
            .children
            .iter()
            .map(|c| tree.nodes[c.index()].value)
            .sum();
        tree.nodes[i].value = match mode {
            ValueMode::Leaves if is_leaf => 1,
            ValueMode::Leaves => children_sum,
            ValueMode::Nodes => 1 + children_sum,
        };
    }
}

/// Compute `height` (distance to the deepest leaf) for all nodes.
pub fn compute_heights(tree: &mut CompanyTree) {
    for i in (0..tree.nodes.len()).rev() {
        let height = tree.nodes[i]
            .children
            .iter()
            .map(|c| tree.nodes[c.index()].height + 1)
            .max()
            .unwrap_or(0);
        tree.nodes[i].height = height;
    }
}

/// Sort children of each node by value (descending). The sort is stable, so
/// equal-valued siblings keep their input order.
pub fn sort_children_by_value(tree: &mut CompanyTree) {
    for i in 0..tree.nodes.len() {
        if tree.nodes[i].children.len() < 2 {
            continue;
        }
        let mut children = std::mem::take(&mut tree.nodes[i].children);
        children.sort_by_key(|&id| std::cmp::Reverse(tree.nodes[id.index()].value));
        tree.nodes[i].children = children;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompanyTree {
        // A -> [C, B], B -> [D, E]
        let mut tree = CompanyTree::new("A");
        tree.add_child(tree.root, "C");
        let b = tree.add_child(tree.root, "B");
        tree.add_child(b, "D");
        tree.add_child(b, "E");
        tree
    }

    #[test]
    fn leaf_values_sum_up() {
        let mut tree = sample();
        aggregate_values(&mut tree, ValueMode::Leaves);
        assert_eq!(tree.get(tree.root).value, 3);
        assert_eq!(tree.get(tree.find("B").unwrap()).value, 2);
        assert_eq!(tree.get(tree.find("C").unwrap()).value, 1);
    }

    #[test]
    fn node_values_count_every_company() {
        let mut tree = sample();
        aggregate_values(&mut tree, ValueMode::Nodes);
        assert_eq!(tree.get(tree.root).value, 5);
        assert_eq!(tree.get(tree.find("B").unwrap()).value, 3);
    }

    #[test]
    fn larger_subtree_sorted_first() {
        let mut tree = sample();
        aggregate_values(&mut tree, ValueMode::Leaves);
        sort_children_by_value(&mut tree);
        let first = tree.children(tree.root)[0];
        assert_eq!(tree.get(first).company, "B");
    }

    #[test]
    fn ties_keep_input_order() {
        let mut tree = CompanyTree::new("R");
        for name in ["x", "y", "z"] {
            tree.add_child(tree.root, name);
        }
        aggregate_values(&mut tree, ValueMode::Leaves);
        sort_children_by_value(&mut tree);
        let names: Vec<_> = tree
            .children(tree.root)
            .iter()
            .map(|&c| tree.get(c).company.as_str())
            .collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[test]
    fn heights_measure_longest_path() {
        let mut tree = sample();
        compute_heights(&mut tree);
        assert_eq!(tree.get(tree.root).height, 2);
        assert_eq!(tree.get(tree.find("C").unwrap()).height, 0);
    }
}
