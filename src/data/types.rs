use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// One row of the input table, before tree construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Company identity, unique within its root group
    pub company: CompactString,
    /// Identity of the parent company (None / empty for the group's root)
    #[serde(default)]
    pub parent: Option<CompactString>,
    /// Grouping key selecting which tree this row belongs to
    pub root: CompactString,
}

impl Record {
    pub fn new(company: &str, parent: Option<&str>, root: &str) -> Self {
        Self {
            company: CompactString::new(company),
            parent: parent
                .filter(|p| !p.trim().is_empty())
                .map(CompactString::new),
            root: CompactString::new(root),
        }
    }

    /// Parent identity with blank values folded into `None`.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
