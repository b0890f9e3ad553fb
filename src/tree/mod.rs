pub mod aggregate;
pub mod arena;

use std::collections::HashMap;

use compact_str::CompactString;
use thiserror::Error;

use self::aggregate::ValueMode;
use self::arena::{CompanyTree, NodeId};
use crate::data::Record;

/// Structural problems that make a root group impossible to draw.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("no records belong to root group '{root}'")]
    EmptyGroup { root: CompactString },
    #[error("company '{company}' appears more than once in root group '{root}'")]
    DuplicateCompany {
        root: CompactString,
        company: CompactString,
    },
    #[error("root group '{root}' has no parentless company")]
    NoRoot { root: CompactString },
    #[error("root group '{root}' has several parentless companies: '{first}' and '{second}'")]
    MultipleRoots {
        root: CompactString,
        first: CompactString,
        second: CompactString,
    },
    #[error("company '{company}' references unknown parent '{parent}'")]
    MissingParent {
        company: CompactString,
        parent: CompactString,
    },
    #[error("company '{company}' is part of a parent cycle")]
    Cycle { company: CompactString },
}

/// Build the company tree for one root group with leaf-count weights.
pub fn build_tree(records: &[Record], root: &str) -> Result<CompanyTree, HierarchyError> {
    build_tree_with(records, root, ValueMode::Leaves)
}

/// Build the company tree for one root group.
///
/// Rows are filtered to `record.root == root`, parents resolved by company
/// identity, values aggregated bottom-up and children sorted by value
/// (descending, stable).
pub fn build_tree_with(
    records: &[Record],
    root: &str,
    mode: ValueMode,
) -> Result<CompanyTree, HierarchyError> {
    let group: Vec<&Record> = records.iter().filter(|r| r.root == root).collect();
    if group.is_empty() {
        return Err(HierarchyError::EmptyGroup { root: root.into() });
    }

    // company -> row index within the group
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(group.len());
    for (i, record) in group.iter().enumerate() {
        if index.insert(record.company.as_str(), i).is_some() {
            return Err(HierarchyError::DuplicateCompany {
                root: root.into(),
                company: record.company.clone(),
            });
        }
    }

    // Resolve parents and collect children in input order.
    let mut root_row: Option<usize> = None;
    let mut child_rows: Vec<Vec<usize>> = vec![Vec::new(); group.len()];
    for (i, record) in group.iter().enumerate() {
        match record.parent_id() {
            None => {
                if let Some(first) = root_row {
                    return Err(HierarchyError::MultipleRoots {
                        root: root.into(),
                        first: group[first].company.clone(),
                        second: record.company.clone(),
                    });
                }
                root_row = Some(i);
            }
            Some(parent) => {
                let parent_row =
                    *index
                        .get(parent)
                        .ok_or_else(|| HierarchyError::MissingParent {
                            company: record.company.clone(),
                            parent: parent.into(),
                        })?;
                child_rows[parent_row].push(i);
            }
        }
    }
    let root_row = root_row.ok_or_else(|| HierarchyError::NoRoot { root: root.into() })?;

    // Breadth-first copy into the arena keeps parents ahead of children.
    let mut tree = CompanyTree::new(&group[root_row].company);
    let mut placed = vec![false; group.len()];
    placed[root_row] = true;
    let mut queue = std::collections::VecDeque::from([(root_row, tree.root)]);
    while let Some((row, id)) = queue.pop_front() {
        for &child_row in &child_rows[row] {
            let child_id = tree.add_child(id, &group[child_row].company);
            placed[child_row] = true;
            queue.push_back((child_row, child_id));
        }
    }

    // Every row has a resolvable parent; anything not reached from the root
    // therefore loops back on itself.
    if let Some(stray) = placed.iter().position(|p| !p) {
        return Err(HierarchyError::Cycle {
            company: group[stray].company.clone(),
        });
    }

    aggregate::aggregate_values(&mut tree, mode);
    aggregate::compute_heights(&mut tree);
    aggregate::sort_children_by_value(&mut tree);

    let root_node = tree.get(tree.root);
    tracing::info!(
        "Tree built for '{}': {} nodes, height {}, value {}",
        root,
        tree.len(),
        root_node.height,
        root_node.value
    );
    for (i, &child) in tree.children(tree.root).iter().take(10).enumerate() {
        let node = tree.get(child);
        tracing::debug!(
            "  [{}] '{}' (value={}, children={})",
            i,
            node.company,
            node.value,
            node.children.len()
        );
    }

    Ok(tree)
}

/// Convenience for callers that hold a node and want its children's names.
pub fn child_names(tree: &CompanyTree, id: NodeId) -> Vec<&str> {
    tree.children(id)
        .iter()
        .map(|&c| tree.get(c).company.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(company: &str, parent: &str, root: &str) -> Record {
        Record::new(company, Some(parent), root)
    }

    fn example() -> Vec<Record> {
        vec![
            rec("A", "", "R"),
            rec("B", "A", "R"),
            rec("C", "A", "R"),
            rec("D", "B", "R"),
        ]
    }

    #[test]
    fn example_tree_shape() {
        let tree = build_tree(&example(), "R").unwrap();
        let root = tree.get(tree.root);
        assert_eq!(root.company, "A");
        assert_eq!(root.value, 2);
        assert_eq!(root.height, 2);
        // B and C tie on value; input order decides
        assert_eq!(child_names(&tree, tree.root), ["B", "C"]);
        let b = tree.find("B").unwrap();
        assert_eq!(child_names(&tree, b), ["D"]);
        assert_eq!(tree.get(tree.find("D").unwrap()).depth, 2);
    }

    #[test]
    fn node_mode_counts_every_company() {
        let tree = build_tree_with(&example(), "R", ValueMode::Nodes).unwrap();
        assert_eq!(tree.get(tree.root).value, 4);
        assert_eq!(tree.get(tree.find("B").unwrap()).value, 2);
        assert_eq!(tree.get(tree.find("C").unwrap()).value, 1);
    }

    #[test]
    fn other_groups_are_ignored() {
        let mut records = example();
        records.push(rec("X", "", "S"));
        records.push(rec("Y", "X", "S"));
        let tree = build_tree(&records, "R").unwrap();
        assert_eq!(tree.len(), 4);
        assert!(tree.find("X").is_none());
    }

    #[test]
    fn bigger_subtree_moves_first() {
        let records = vec![
            rec("A", "", "R"),
            rec("small", "A", "R"),
            rec("big", "A", "R"),
            rec("b1", "big", "R"),
            rec("b2", "big", "R"),
        ];
        let tree = build_tree(&records, "R").unwrap();
        assert_eq!(child_names(&tree, tree.root), ["big", "small"]);
    }

    #[test]
    fn chains_deeper_than_u16_build() {
        let len = 70_000usize;
        let names: Vec<String> = (0..len).map(|i| format!("c{i}")).collect();
        let mut records = vec![rec(&names[0], "", "R")];
        for pair in names.windows(2) {
            records.push(rec(&pair[1], &pair[0], "R"));
        }

        let tree = build_tree(&records, "R").unwrap();
        let last = tree.find(&names[len - 1]).unwrap();
        assert_eq!(tree.get(last).depth, (len - 1) as u32);
        assert_eq!(tree.get(tree.root).height, (len - 1) as u32);
        assert_eq!(tree.get(tree.root).value, 1);

        let spans = crate::layout::partition::partition(&tree);
        assert_eq!(spans[last.index()].y0, (len - 1) as f64);
        assert_eq!(spans[last.index()].y1, len as f64);
    }

    #[test]
    fn empty_group_is_rejected() {
        let err = build_tree(&example(), "nope").unwrap_err();
        assert!(matches!(err, HierarchyError::EmptyGroup { .. }));
    }

    #[test]
    fn two_roots_are_rejected() {
        let mut records = example();
        records.push(rec("Z", "", "R"));
        let err = build_tree(&records, "R").unwrap_err();
        assert_eq!(
            err,
            HierarchyError::MultipleRoots {
                root: "R".into(),
                first: "A".into(),
                second: "Z".into(),
            }
        );
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut records = example();
        records.push(rec("E", "ghost", "R"));
        let err = build_tree(&records, "R").unwrap_err();
        assert!(matches!(err, HierarchyError::MissingParent { .. }));
    }

    #[test]
    fn cycle_is_rejected() {
        let mut records = example();
        records.push(rec("P", "Q", "R"));
        records.push(rec("Q", "P", "R"));
        let err = build_tree(&records, "R").unwrap_err();
        assert_eq!(err, HierarchyError::Cycle { company: "P".into() });
    }

    #[test]
    fn all_nodes_in_a_cycle_means_no_root() {
        let records = vec![rec("P", "Q", "R"), rec("Q", "P", "R")];
        let err = build_tree(&records, "R").unwrap_err();
        assert!(matches!(err, HierarchyError::NoRoot { .. }));
    }

    #[test]
    fn duplicate_company_is_rejected() {
        let mut records = example();
        records.push(rec("C", "B", "R"));
        let err = build_tree(&records, "R").unwrap_err();
        assert!(matches!(err, HierarchyError::DuplicateCompany { .. }));
    }
}
