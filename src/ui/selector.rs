use std::collections::HashSet;

use compact_str::CompactString;

use crate::data::Record;

/// Distinct root groups in first-seen order.
pub fn list_roots(records: &[Record]) -> Vec<CompactString> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut roots: Vec<CompactString> = Vec::new();
    for record in records {
        if seen.insert(record.root.as_str()) {
            roots.push(record.root.clone());
        }
    }
    roots
}

/// Emitted whenever the selected root actually changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RootChanged {
    pub root: CompactString,
}

/// The list of selectable root groups and which one is shown.
#[derive(Debug, Clone, Default)]
pub struct RootSelector {
    options: Vec<CompactString>,
    selected: Option<usize>,
}

impl RootSelector {
    /// Fill the options from the loaded records and select the first one.
    pub fn populate(records: &[Record]) -> (Self, Option<RootChanged>) {
        let options = list_roots(records);
        tracing::info!("{} root groups available", options.len());
        let mut selector = Self {
            options,
            selected: None,
        };
        let changed = selector.select_index(0);
        (selector, changed)
    }

    pub fn options(&self) -> &[CompactString] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Option<&str> {
        self.selected.map(|i| self.options[i].as_str())
    }

    /// Select by name. Unknown names leave the selection alone.
    pub fn select(&mut self, root: &str) -> Option<RootChanged> {
        let index = self.options.iter().position(|r| r == root);
        match index {
            Some(index) => self.select_index(index),
            None => {
                tracing::warn!("Unknown root group '{}'", root);
                None
            }
        }
    }

    pub fn select_index(&mut self, index: usize) -> Option<RootChanged> {
        if index >= self.options.len() || self.selected == Some(index) {
            return None;
        }
        self.selected = Some(index);
        Some(RootChanged {
            root: self.options[index].clone(),
        })
    }

    /// Step to the next root, wrapping around.
    pub fn select_next(&mut self) -> Option<RootChanged> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }
        let next = self.selected.map_or(0, |i| (i + 1) % len);
        self.select_index(next)
    }

    /// Step to the previous root, wrapping around.
    pub fn select_previous(&mut self) -> Option<RootChanged> {
        let len = self.options.len();
        if len == 0 {
            return None;
        }
        let prev = self.selected.map_or(0, |i| (i + len - 1) % len);
        self.select_index(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("A", None, "north"),
            Record::new("X", None, "south"),
            Record::new("B", Some("A"), "north"),
            Record::new("Y", None, "east"),
        ]
    }

    #[test]
    fn roots_keep_first_seen_order() {
        assert_eq!(list_roots(&records()), ["north", "south", "east"]);
    }

    #[test]
    fn many_rows_over_many_roots_dedupe() {
        let records: Vec<Record> = (0..20_000)
            .map(|i| Record::new(&format!("c{i}"), None, &format!("g{}", (i * 7) % 500)))
            .collect();
        let roots = list_roots(&records);
        assert_eq!(roots.len(), 500);
        assert_eq!(roots[0], "g0");
        assert_eq!(roots[1], "g7");
        assert_eq!(roots[499], format!("g{}", (499 * 7) % 500).as_str());
    }

    #[test]
    fn populate_selects_first_root() {
        let (selector, changed) = RootSelector::populate(&records());
        assert_eq!(changed.map(|c| c.root), Some("north".into()));
        assert_eq!(selector.current(), Some("north"));
    }

    #[test]
    fn empty_input_selects_nothing() {
        let (mut selector, changed) = RootSelector::populate(&[]);
        assert!(changed.is_none());
        assert_eq!(selector.current(), None);
        assert!(selector.select_next().is_none());
    }

    #[test]
    fn reselecting_is_not_a_change() {
        let (mut selector, _) = RootSelector::populate(&records());
        assert!(selector.select("north").is_none());
        assert!(selector.select("nowhere").is_none());
        assert_eq!(selector.select("east").map(|c| c.root), Some("east".into()));
    }

    #[test]
    fn cycling_wraps_around() {
        let (mut selector, _) = RootSelector::populate(&records());
        assert_eq!(selector.select_previous().map(|c| c.root), Some("east".into()));
        assert_eq!(selector.select_next().map(|c| c.root), Some("north".into()));
        assert_eq!(selector.select_next().map(|c| c.root), Some("south".into()));
    }

    #[test]
    fn single_root_never_changes() {
        let (mut selector, _) = RootSelector::populate(&records()[..1]);
        assert!(selector.select_next().is_none());
        assert!(selector.select_previous().is_none());
    }
}
