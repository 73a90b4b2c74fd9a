//! Framework catalog: CSV feed parsing, objective filtering, and the loader
//! that fetches the feed over HTTP.

pub mod parser;
pub mod filter;
pub mod loader;

use crate::models::framework::FrameworkRecord;

/// The in-memory record set for one loader cycle.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<FrameworkRecord>,
}

impl Catalog {
    pub fn new(records: Vec<FrameworkRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FrameworkRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&FrameworkRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
