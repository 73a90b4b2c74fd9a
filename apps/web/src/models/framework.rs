use serde::{Deserialize, Serialize};

/// Separator between objective tags inside the `objectives` CSV column.
pub const OBJECTIVE_SEPARATOR: char = '|';

/// One row of the framework catalog. Immutable once parsed; a reload replaces
/// the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkRecord {
    pub id: String,
    pub name: String,
    pub synopsis: String,
    pub template: String,
    pub objectives: Vec<String>,
}

impl FrameworkRecord {
    /// Exact tag match; tags are already trimmed at parse time.
    pub fn has_objective(&self, objective: &str) -> bool {
        self.objectives.iter().any(|o| o == objective.trim())
    }
}

/// Splits the pipe-delimited source form into trimmed, non-empty tags.
pub fn split_objectives(raw: &str) -> Vec<String> {
    raw.split(OBJECTIVE_SEPARATOR)
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
