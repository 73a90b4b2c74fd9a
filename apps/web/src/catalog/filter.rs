//! Pure derivations over a loaded record set.

use crate::models::framework::FrameworkRecord;

/// Union of every record's tags, in first-seen order, without duplicates.
pub fn distinct_objectives(records: &[FrameworkRecord]) -> Vec<String> {
    let mut objectives: Vec<String> = Vec::new();
    for tag in records.iter().flat_map(|r| r.objectives.iter()) {
        if !objectives.contains(tag) {
            objectives.push(tag.clone());
        }
    }
    objectives
}

/// Records tagged with `objective`, or every record when no objective is
/// selected. `Some` of an unknown tag yields an empty list, never the full set.
pub fn filter_by_objective<'a>(
    records: &'a [FrameworkRecord],
    objective: Option<&str>,
) -> Vec<&'a FrameworkRecord> {
    match objective {
        None => records.iter().collect(),
        Some(tag) => records.iter().filter(|r| r.has_objective(tag)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, tags: &[&str]) -> FrameworkRecord {
        FrameworkRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            synopsis: String::new(),
            template: String::new(),
            objectives: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn fixture() -> Vec<FrameworkRecord> {
        vec![
            record("pas", &["Sales", "Email"]),
            record("aida", &["Ads", "Sales"]),
            record("bab", &["Trust"]),
            record("fab", &[]),
        ]
    }

    #[test]
    fn test_distinct_objectives_first_seen_order_no_duplicates() {
        assert_eq!(
            distinct_objectives(&fixture()),
            vec!["Sales", "Email", "Ads", "Trust"]
        );
    }

    #[test]
    fn test_distinct_objectives_empty_set() {
        assert!(distinct_objectives(&[]).is_empty());
    }

    #[test]
    fn test_filter_by_tag_returns_exact_subset() {
        let records = fixture();
        let ids: Vec<&str> = filter_by_objective(&records, Some("Sales"))
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["pas", "aida"]);
    }

    #[test]
    fn test_filter_without_objective_returns_all() {
        let records = fixture();
        assert_eq!(filter_by_objective(&records, None).len(), records.len());
    }

    #[test]
    fn test_unknown_objective_is_distinct_from_no_objective() {
        let records = fixture();
        assert!(filter_by_objective(&records, Some("Nope")).is_empty());
        assert!(!filter_by_objective(&records, None).is_empty());
    }
}
