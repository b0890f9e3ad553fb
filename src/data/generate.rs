use std::collections::HashSet;
use std::ops::RangeInclusive;

use compact_str::{format_compact, CompactString};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::Record;

const SURNAMES: &[&str] = &[
    "Adams", "Baker", "Barnes", "Bell", "Brooks", "Bryant", "Carter", "Chen", "Clark", "Cole",
    "Cruz", "Diaz", "Dixon", "Ellis", "Evans", "Fisher", "Ford", "Garcia", "Gibson", "Gray",
    "Hale", "Hayes", "Hughes", "Hunt", "Jensen", "Kelly", "Knight", "Lane", "Lopez", "Mason",
    "Meyer", "Mills", "Moreno", "Nash", "Olson", "Owens", "Patel", "Perry", "Price", "Reed",
    "Reyes", "Rios", "Russell", "Shaw", "Silva", "Stone", "Tate", "Vargas", "Walsh", "Webb",
    "Wells", "West", "Wolfe", "Young",
];

const SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "PLC", "Ltd", "and Sons", "Holdings"];

/// Parameters for the synthetic company hierarchy.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Number of independent root groups
    pub roots: usize,
    /// Nodes at this depth (root = 1) never get children
    pub max_depth: usize,
    /// Chance that a non-root node stops branching early
    pub leaf_probability: f64,
    /// Number of children for a branching node
    pub children: RangeInclusive<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            roots: 15,
            max_depth: 5,
            leaf_probability: 0.35,
            children: 3..=6,
        }
    }
}

/// Deterministically generate a company table: same config, same rows.
/// Rows come out in pre-order, each root row with an empty parent.
pub fn generate(config: &GeneratorConfig) -> Vec<Record> {
    let mut gen = Generator {
        rng: StdRng::seed_from_u64(config.seed),
        seen: HashSet::new(),
        rows: Vec::new(),
        config,
    };

    for _ in 0..config.roots {
        let root = gen.company_name();
        gen.grow(root.clone(), None, &root, 1);
    }

    tracing::info!(
        "Generated {} rows across {} roots (seed={})",
        gen.rows.len(),
        config.roots,
        config.seed
    );
    gen.rows
}

struct Generator<'a> {
    rng: StdRng,
    seen: HashSet<CompactString>,
    rows: Vec<Record>,
    config: &'a GeneratorConfig,
}

impl Generator<'_> {
    fn grow(
        &mut self,
        node: CompactString,
        parent: Option<CompactString>,
        root: &CompactString,
        depth: usize,
    ) {
        let is_root = parent.is_none();
        self.rows.push(Record {
            company: node.clone(),
            parent,
            root: root.clone(),
        });

        if depth >= self.config.max_depth
            || (!is_root && self.rng.gen::<f64>() < self.config.leaf_probability)
        {
            return;
        }

        let count = self.rng.gen_range(self.config.children.clone());
        for _ in 0..count {
            let child = self.company_name();
            self.grow(child, Some(node.clone()), root, depth + 1);
        }
    }

    /// A fresh company name, never repeated within one run.
    fn company_name(&mut self) -> CompactString {
        for _ in 0..64 {
            let candidate = self.candidate_name();
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
        }
        // Pool exhausted for this shape: disambiguate with a counter.
        let base = self.candidate_name();
        let name = format_compact!("{} {}", base, self.seen.len());
        self.seen.insert(name.clone());
        name
    }

    fn candidate_name(&mut self) -> CompactString {
        let a = self.surname();
        match self.rng.gen_range(0..3) {
            0 => {
                let suffix = SUFFIXES[self.rng.gen_range(0..SUFFIXES.len())];
                format_compact!("{} {}", a, suffix)
            }
            1 => {
                let b = self.surname();
                format_compact!("{}-{}", a, b)
            }
            _ => {
                let b = self.surname();
                let c = self.surname();
                format_compact!("{}, {} and {}", a, b, c)
            }
        }
    }

    fn surname(&mut self) -> &'static str {
        SURNAMES[self.rng.gen_range(0..SURNAMES.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use crate::ui::selector::list_roots;

    #[test]
    fn same_seed_same_rows() {
        let config = GeneratorConfig {
            roots: 3,
            ..Default::default()
        };
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn company_names_are_unique() {
        let rows = generate(&GeneratorConfig::default());
        let unique: HashSet<_> = rows.iter().map(|r| r.company.clone()).collect();
        assert_eq!(unique.len(), rows.len());
    }

    #[test]
    fn every_generated_group_builds_a_tree() {
        let config = GeneratorConfig {
            roots: 4,
            seed: 7,
            ..Default::default()
        };
        let rows = generate(&config);
        let roots = list_roots(&rows);
        assert_eq!(roots.len(), 4);
        for root in &roots {
            let tree = build_tree(&rows, root).unwrap();
            assert_eq!(tree.get(tree.root).company, *root);
            // depth counted from 0 here, from 1 in the generator
            assert!(tree.get(tree.root).height < config.max_depth as u32);
        }
    }

    #[test]
    fn root_rows_have_no_parent() {
        let rows = generate(&GeneratorConfig {
            roots: 2,
            ..Default::default()
        });
        for row in rows.iter().filter(|r| r.company == r.root) {
            assert!(row.parent.is_none());
        }
    }
}
